//! Whole-file snapshot loading, saving and graph reconstruction.

use crate::atomic::write_records_atomic;
use crate::error::{Error, Result};
use crate::reader::SnapshotReader;
use crate::record::{records, EntityRecord, SnapshotHeader};
use asgraph_core::{AsGraph, Asn, CustomerProviderLink, GraphBuilder, PeerLink};
use std::collections::BTreeSet;
use std::path::Path;
use tokio::fs::File;

/// Upper bound on records reserved up front from the header's count.
const MAX_PREALLOCATED_RECORDS: usize = 1 << 16;

/// An annotated graph held as flat records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// The header line
    pub header: SnapshotHeader,
    /// One record per entity, ascending by ASN
    pub records: Vec<EntityRecord>,
}

/// Relationship inputs recovered from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotLinks {
    /// Customer-provider links
    pub customer_provider: BTreeSet<CustomerProviderLink>,
    /// Peer links, canonically ordered
    pub peers: BTreeSet<PeerLink>,
    /// IXP ASNs
    pub ixps: BTreeSet<Asn>,
    /// Top-clique ASNs
    pub input_clique: BTreeSet<Asn>,
}

impl Snapshot {
    /// Capture every entity of `graph`.
    #[must_use]
    pub fn from_graph<D>(graph: &AsGraph<D>, source_digest: Option<String>) -> Self {
        Self {
            header: SnapshotHeader::for_graph(graph, source_digest),
            records: records(graph).collect(),
        }
    }

    /// Read a snapshot file.
    ///
    /// # Errors
    ///
    /// Any reader error, or [`Error::InvalidFormat`] when the record count
    /// disagrees with the header or records are not strictly ascending.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        let mut reader = SnapshotReader::new(file);
        let header = reader.read_header().await?;

        let mut records = Vec::with_capacity(header.entity_count.min(MAX_PREALLOCATED_RECORDS));
        while let Some(record) = reader.read_record().await? {
            if records
                .last()
                .is_some_and(|prev: &EntityRecord| prev.asn >= record.asn)
            {
                return Err(Error::InvalidFormat(format!(
                    "line {}: AS{} is out of order",
                    reader.line_number(),
                    record.asn
                )));
            }
            records.push(record);
        }

        if records.len() != header.entity_count {
            return Err(Error::InvalidFormat(format!(
                "header announces {} entities, found {}",
                header.entity_count,
                records.len()
            )));
        }

        tracing::debug!(path = %path.display(), entities = records.len(), "snapshot loaded");
        Ok(Self { header, records })
    }

    /// Atomically write this snapshot to `path`.
    ///
    /// # Errors
    ///
    /// See [`write_records_atomic`](crate::write_records_atomic).
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_records_atomic(path, &self.header, &self.records).await
    }

    /// Look up one record by ASN.
    #[must_use]
    pub fn get(&self, asn: Asn) -> Option<&EntityRecord> {
        self.records
            .binary_search_by_key(&asn, |record| record.asn)
            .ok()
            .map(|index| &self.records[index])
    }

    /// The relationship inputs that produced this snapshot.
    ///
    /// Each record lists its providers and peers, so every link appears at
    /// least once; duplicates collapse in the sets.
    #[must_use]
    pub fn links(&self) -> SnapshotLinks {
        let mut links = SnapshotLinks::default();
        for record in &self.records {
            links.customer_provider.extend(
                record
                    .providers
                    .iter()
                    .map(|&provider| CustomerProviderLink::new(record.asn, provider)),
            );
            links
                .peers
                .extend(record.peers.iter().map(|&peer| PeerLink::new(record.asn, peer)));
            if record.ixp {
                links.ixps.insert(record.asn);
            }
            if record.input_clique {
                links.input_clique.insert(record.asn);
            }
        }
        links
    }

    /// Rebuild and annotate the graph this snapshot was taken from.
    ///
    /// # Errors
    ///
    /// [`Error::Graph`] if the recovered links do not form a valid graph.
    pub fn rebuild(&self) -> Result<AsGraph> {
        let links = self.links();
        let graph = GraphBuilder::new()
            .customer_provider_links(links.customer_provider)
            .peer_links(links.peers)
            .ixps(links.ixps)
            .input_clique(links.input_clique)
            .build()?;
        Ok(graph)
    }
}
