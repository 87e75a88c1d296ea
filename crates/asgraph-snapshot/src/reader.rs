//! Snapshot reading.
//!
//! This module provides async, line-by-line reading of snapshot files with
//! line number tracking for error reporting. Blank lines are skipped.

use crate::error::{Error, Result};
use crate::record::{EntityRecord, SnapshotHeader, FORMAT_VERSION};
use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Async reader for snapshot files.
///
/// # Examples
///
/// ```no_run
/// use asgraph_snapshot::SnapshotReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("graph.snapshot.jsonl").await?;
/// let mut reader = SnapshotReader::new(file);
/// let header = reader.read_header().await?;
/// while let Some(record) = reader.read_record().await? {
///     println!("AS{} cone={:?}", record.asn, record.customer_cone_size);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SnapshotReader<R> {
    reader: BufReader<R>,
    /// 1-based number of the last line read, 0 before any.
    line_number: usize,
    header_read: bool,
    buffer: String,
}

impl<R: AsyncRead + Unpin> SnapshotReader<R> {
    /// Creates a new `SnapshotReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            header_read: false,
            buffer: String::new(),
        }
    }

    /// Returns the 1-based number of the last line read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read and validate the header line.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFormat`] for an empty input or a second call
    /// - [`Error::Parse`] if the first line is not a header
    /// - [`Error::UnsupportedVersion`] if the version differs from [`FORMAT_VERSION`]
    pub async fn read_header(&mut self) -> Result<SnapshotHeader> {
        if self.header_read {
            return Err(Error::InvalidFormat("header already read".to_string()));
        }
        let header: SnapshotHeader = self
            .read_value()
            .await?
            .ok_or_else(|| Error::InvalidFormat("snapshot is empty".to_string()))?;
        if header.format_version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion {
                found: header.format_version,
                expected: FORMAT_VERSION,
            });
        }
        self.header_read = true;
        Ok(header)
    }

    /// Read the next entity record, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFormat`] before the header is read; [`Error::Parse`]
    /// for a malformed line.
    pub async fn read_record(&mut self) -> Result<Option<EntityRecord>> {
        if !self.header_read {
            return Err(Error::InvalidFormat(
                "read_header must be called before read_record".to_string(),
            ));
        }
        self.read_value().await
    }

    /// Turn the remaining records into a stream.
    pub fn into_records(self) -> impl Stream<Item = Result<EntityRecord>> {
        stream::try_unfold(self, |mut reader| async move {
            let record = reader.read_record().await?;
            Ok(record.map(|record| (record, reader)))
        })
    }

    async fn read_value<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        loop {
            self.buffer.clear();
            let read = self.reader.read_line(&mut self.buffer).await?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }
            return serde_json::from_str(line)
                .map(Some)
                .map_err(|source| Error::Parse {
                    line: self.line_number,
                    source,
                });
        }
    }
}
