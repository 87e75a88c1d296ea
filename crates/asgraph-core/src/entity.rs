//! Autonomous system entities.
//!
//! An entity goes through two states:
//!
//! 1. [`EntityDraft`]: relationship *sets* that the builder fills in while it
//!    walks the link records. Drafts never leave the builder.
//! 2. [`Entity`]: relationships frozen into ascending ASN sequences. After the
//!    rank and cone passes have written their single value each, the entity
//!    is read-only.
//!
//! Relationships are stored as ASNs, not references. Resolve them through the
//! owning [`AsGraph`](crate::graph::AsGraph).

use crate::asn::Asn;
use crate::error::Result;
use std::collections::HashSet;

/// Builds the per-entity payload when the graph first sees an ASN.
///
/// Callers that need extra per-AS state (simulation policy, annotations from
/// another dataset) supply their own factory; [`PlainEntities`] carries none.
pub trait EntityFactory {
    /// Payload stored on every entity.
    type Data;

    /// Create the payload for `asn`.
    ///
    /// # Errors
    ///
    /// Implementations return [`Error::InvalidIdentifier`](crate::Error::InvalidIdentifier)
    /// for ASNs they refuse to model. The build aborts on the first error.
    fn create(&self, asn: Asn) -> Result<Self::Data>;
}

/// Factory for entities without a payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainEntities;

impl EntityFactory for PlainEntities {
    type Data = ();

    fn create(&self, _asn: Asn) -> Result<()> {
        Ok(())
    }
}

/// Entity under construction.
#[derive(Debug)]
pub(crate) struct EntityDraft<D> {
    pub(crate) asn: Asn,
    pub(crate) peers: HashSet<Asn>,
    pub(crate) customers: HashSet<Asn>,
    pub(crate) providers: HashSet<Asn>,
    pub(crate) ixp: bool,
    pub(crate) input_clique: bool,
    pub(crate) data: D,
}

impl<D> EntityDraft<D> {
    pub(crate) fn new(asn: Asn, data: D) -> Self {
        Self {
            asn,
            peers: HashSet::new(),
            customers: HashSet::new(),
            providers: HashSet::new(),
            ixp: false,
            input_clique: false,
            data,
        }
    }

    /// Convert relationship sets into ascending sequences.
    pub(crate) fn freeze(self) -> Entity<D> {
        Entity {
            asn: self.asn,
            peers: sorted(self.peers),
            customers: sorted(self.customers),
            providers: sorted(self.providers),
            ixp: self.ixp,
            input_clique: self.input_clique,
            propagation_rank: None,
            customer_cone_size: None,
            data: self.data,
        }
    }
}

fn sorted(set: HashSet<Asn>) -> Box<[Asn]> {
    let mut asns: Vec<Asn> = set.into_iter().collect();
    asns.sort_unstable();
    asns.into_boxed_slice()
}

/// One autonomous system in a frozen graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity<D = ()> {
    asn: Asn,
    peers: Box<[Asn]>,
    customers: Box<[Asn]>,
    providers: Box<[Asn]>,
    ixp: bool,
    input_clique: bool,
    propagation_rank: Option<u32>,
    customer_cone_size: Option<usize>,
    data: D,
}

impl<D> Entity<D> {
    /// This entity's ASN.
    #[must_use]
    pub fn asn(&self) -> Asn {
        self.asn
    }

    /// Peers, ascending.
    #[must_use]
    pub fn peers(&self) -> &[Asn] {
        &self.peers
    }

    /// Customers, ascending.
    #[must_use]
    pub fn customers(&self) -> &[Asn] {
        &self.customers
    }

    /// Providers, ascending.
    #[must_use]
    pub fn providers(&self) -> &[Asn] {
        &self.providers
    }

    /// Whether the dataset lists this AS as an internet exchange point.
    #[must_use]
    pub fn is_ixp(&self) -> bool {
        self.ixp
    }

    /// Whether the dataset lists this AS in the top-tier clique.
    #[must_use]
    pub fn is_input_clique(&self) -> bool {
        self.input_clique
    }

    /// Longest customer chain ending at this AS, once ranks are assigned.
    #[must_use]
    pub fn propagation_rank(&self) -> Option<u32> {
        self.propagation_rank
    }

    /// Number of ASes below this one, once cones are computed.
    #[must_use]
    pub fn customer_cone_size(&self) -> Option<usize> {
        self.customer_cone_size
    }

    /// The factory payload.
    #[must_use]
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Total number of relationships.
    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        self.peers.len() + self.customers.len() + self.providers.len()
    }

    /// Peers, customers and providers chained, in that order.
    pub fn neighbors(&self) -> impl Iterator<Item = Asn> + '_ {
        self.peers
            .iter()
            .chain(self.customers.iter())
            .chain(self.providers.iter())
            .copied()
    }

    /// Stub by RFC 1772: exactly one relationship of any kind.
    #[must_use]
    pub fn is_stub(&self) -> bool {
        self.neighbor_count() == 1
    }

    /// Multihomed by RFC 1772: no customers, more than one peer or provider.
    #[must_use]
    pub fn is_multihomed(&self) -> bool {
        self.customers.is_empty() && self.peers.len() + self.providers.len() > 1
    }

    /// Transit by RFC 1772: more than one customer.
    #[must_use]
    pub fn is_transit(&self) -> bool {
        self.customers.len() > 1
    }

    pub(crate) fn set_propagation_rank(&mut self, rank: u32) {
        debug_assert!(self.propagation_rank.is_none(), "rank assigned twice");
        self.propagation_rank = Some(rank);
    }

    pub(crate) fn set_customer_cone_size(&mut self, size: usize) {
        debug_assert!(self.customer_cone_size.is_none(), "cone assigned twice");
        self.customer_cone_size = Some(size);
    }
}
