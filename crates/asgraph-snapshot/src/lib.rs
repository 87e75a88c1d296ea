//! JSONL snapshots of annotated AS relationship graphs.
//!
//! A snapshot is one header line followed by one record per entity, ascending
//! by ASN. Snapshots are written atomically and can rebuild the graph they
//! were taken from.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod record;
pub mod snapshot;
pub mod writer;

pub use atomic::{write_records_atomic, write_snapshot_atomic};
pub use error::{Error, Result};
pub use reader::SnapshotReader;
pub use record::{records, source_digest, EntityRecord, SnapshotHeader, FORMAT_VERSION};
pub use snapshot::{Snapshot, SnapshotLinks};
pub use writer::SnapshotWriter;
