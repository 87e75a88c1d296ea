//! Error types for asgraph CLI operations.

use asgraph_core::Asn;
use std::io;
use thiserror::Error;

/// The error type for asgraph CLI operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A dataset line could not be understood.
    #[error("dataset line {line}: {message}")]
    Dataset {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// Graph construction failed.
    #[error(transparent)]
    Graph(#[from] asgraph_core::Error),

    /// Snapshot reading or writing failed.
    #[error(transparent)]
    Snapshot(#[from] asgraph_snapshot::Error),

    /// A stored snapshot record disagrees with the graph rebuilt from it.
    #[error("snapshot record for AS{0} does not match the rebuilt graph")]
    SnapshotMismatch(Asn),

    /// The requested entity is not in the graph.
    #[error("AS{0} is not in the graph")]
    EntityNotFound(Asn),

    /// The requested propagation rank does not exist.
    #[error("rank {rank} is out of range (graph has {tiers} tiers)")]
    RankOutOfRange {
        /// Requested rank
        rank: usize,
        /// Number of tiers in the graph
        tiers: usize,
    },
}

/// A specialized Result type for asgraph operations.
pub type Result<T> = std::result::Result<T, Error>;
