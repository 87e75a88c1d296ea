//! Serializable rows of an annotated graph.
//!
//! A snapshot file is one [`SnapshotHeader`] line followed by one
//! [`EntityRecord`] line per entity, ascending by ASN. Records carry scalars
//! and ASN lists only, never graph pointers, so a snapshot can rebuild the
//! graph it came from.

use asgraph_core::{AsGraph, Asn, Entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Snapshot layout version written by this build.
pub const FORMAT_VERSION: u32 = 1;

/// First line of every snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    /// Layout version, see [`FORMAT_VERSION`]
    pub format_version: u32,

    /// When the snapshot was produced
    pub generated_at: DateTime<Utc>,

    /// SHA-256 of the relationship dataset the graph was built from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_digest: Option<String>,

    /// Number of entity lines that follow
    pub entity_count: usize,

    /// Number of propagation-rank tiers
    pub rank_count: usize,
}

impl SnapshotHeader {
    /// Header describing `graph`, stamped with the current time.
    #[must_use]
    pub fn for_graph<D>(graph: &AsGraph<D>, source_digest: Option<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            generated_at: Utc::now(),
            source_digest,
            entity_count: graph.len(),
            rank_count: graph.propagation_ranks().map_or(0, <[_]>::len),
        }
    }
}

/// One entity with its relationships and derived metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// The entity's ASN
    pub asn: Asn,
    /// Peers, ascending
    pub peers: Vec<Asn>,
    /// Customers, ascending
    pub customers: Vec<Asn>,
    /// Providers, ascending
    pub providers: Vec<Asn>,
    /// Top-tier clique member
    pub input_clique: bool,
    /// Internet exchange point
    pub ixp: bool,
    /// Size of the customer cone
    pub customer_cone_size: Option<usize>,
    /// Propagation rank
    pub propagation_rank: Option<u32>,
    /// Customers that are stubs, ascending
    pub stubs: Vec<Asn>,
    /// Exactly one relationship
    pub stub: bool,
    /// No customers, several peers or providers
    pub multihomed: bool,
    /// More than one customer
    pub transit: bool,
}

impl EntityRecord {
    /// Record for `entity`, resolving its stub customers through `graph`.
    #[must_use]
    pub fn new<D>(graph: &AsGraph<D>, entity: &Entity<D>) -> Self {
        Self {
            asn: entity.asn(),
            peers: entity.peers().to_vec(),
            customers: entity.customers().to_vec(),
            providers: entity.providers().to_vec(),
            input_clique: entity.is_input_clique(),
            ixp: entity.is_ixp(),
            customer_cone_size: entity.customer_cone_size(),
            propagation_rank: entity.propagation_rank(),
            stubs: graph.stub_customers(entity.asn()),
            stub: entity.is_stub(),
            multihomed: entity.is_multihomed(),
            transit: entity.is_transit(),
        }
    }
}

/// Records for every entity of `graph`, ascending by ASN.
pub fn records<D>(graph: &AsGraph<D>) -> impl Iterator<Item = EntityRecord> + '_ {
    graph.iter().map(move |entity| EntityRecord::new(graph, entity))
}

/// Lowercase hex SHA-256 of a dataset's bytes.
#[must_use]
pub fn source_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
