//! Error types for snapshot reading and writing.

use std::io;
use thiserror::Error;

/// The error type for asgraph-snapshot operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A value could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line could not be parsed.
    #[error("line {line}: {source}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// The file does not have the snapshot layout.
    #[error("Invalid snapshot format: {0}")]
    InvalidFormat(String),

    /// The header names a format version this build does not read.
    #[error("unsupported snapshot format version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the header
        found: u32,
        /// Version this build writes
        expected: u32,
    },

    /// Rebuilding a graph from the snapshot failed.
    #[error("graph error: {0}")]
    Graph(#[from] asgraph_core::Error),
}

/// A specialized Result type for asgraph-snapshot operations.
pub type Result<T> = std::result::Result<T, Error>;
