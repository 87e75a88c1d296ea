//! Crash-safe snapshot files.
//!
//! The snapshot is written to a sibling `.tmp` file, flushed, and renamed over
//! the target. Renames within one filesystem are atomic on POSIX, so readers
//! see either the previous snapshot or the complete new one.

use crate::error::Result;
use crate::record::{records, EntityRecord, SnapshotHeader};
use crate::writer::SnapshotWriter;
use asgraph_core::AsGraph;
use std::borrow::Borrow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Atomically write `graph` as a snapshot at `path`.
///
/// Returns the header that was written.
///
/// # Errors
///
/// See [`write_records_atomic`].
pub async fn write_snapshot_atomic<D>(
    path: impl AsRef<Path>,
    graph: &AsGraph<D>,
    source_digest: Option<String>,
) -> Result<SnapshotHeader> {
    let header = SnapshotHeader::for_graph(graph, source_digest);
    write_records_atomic(path, &header, records(graph)).await?;
    Ok(header)
}

/// Atomically write a header and its records at `path`.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, or if
/// the rename fails (for example across filesystems). On failure the target
/// is left untouched and the temporary file is removed on a best-effort basis.
pub async fn write_records_atomic<I>(
    path: impl AsRef<Path>,
    header: &SnapshotHeader,
    records: I,
) -> Result<()>
where
    I: IntoIterator,
    I::Item: Borrow<EntityRecord>,
{
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    if let Err(e) = write_to_temp_file(&temp_path, header, records).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    tokio::fs::rename(&temp_path, path).await?;
    tracing::debug!(path = %path.display(), entities = header.entity_count, "snapshot saved");
    Ok(())
}

/// `graph.jsonl` becomes `graph.jsonl.tmp`, `graph` becomes `graph.tmp`.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let extension = match path.extension() {
        Some(ext) => {
            let mut ext = ext.to_os_string();
            ext.push(".tmp");
            ext
        }
        None => OsString::from("tmp"),
    };
    temp_path.set_extension(extension);
    temp_path
}

async fn write_to_temp_file<I>(temp_path: &Path, header: &SnapshotHeader, records: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: Borrow<EntityRecord>,
{
    let file = File::create(temp_path).await?;
    let mut writer = SnapshotWriter::new(file);
    writer.write_header(header).await?;
    for record in records {
        writer.write_record(record.borrow()).await?;
    }
    writer.flush().await?;
    Ok(())
}
