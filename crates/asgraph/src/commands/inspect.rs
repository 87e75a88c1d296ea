//! Implementation of the `inspect` command.
//!
//! A snapshot stores both the relationships and the metrics derived from
//! them. Inspecting rebuilds the graph from the relationships and checks
//! that every stored record matches the rebuilt one.

use crate::error::{Error, Result};
use asgraph_core::{AsGraph, Asn};
use asgraph_snapshot::{records, EntityRecord, Snapshot};

/// Rebuild the graph behind `snapshot` and check it against the stored records.
///
/// # Errors
///
/// [`Error::Snapshot`] if the relationships do not form a valid graph, or
/// [`Error::SnapshotMismatch`] naming the first AS whose stored record
/// differs from the rebuilt one.
pub fn rebuild_verified(snapshot: &Snapshot) -> Result<AsGraph> {
    let graph = snapshot.rebuild()?;
    let rebuilt: Vec<EntityRecord> = records(&graph).collect();

    if let Some(asn) = first_mismatch(&rebuilt, &snapshot.records) {
        return Err(Error::SnapshotMismatch(asn));
    }

    tracing::debug!(entities = rebuilt.len(), "snapshot verified against rebuilt graph");
    Ok(graph)
}

fn first_mismatch(rebuilt: &[EntityRecord], stored: &[EntityRecord]) -> Option<Asn> {
    let differing = rebuilt
        .iter()
        .zip(stored)
        .find(|(a, b)| a != b)
        .map(|(a, b)| a.asn.min(b.asn));

    differing.or_else(|| {
        let shorter = rebuilt.len().min(stored.len());
        rebuilt
            .get(shorter)
            .or_else(|| stored.get(shorter))
            .map(|record| record.asn)
    })
}
