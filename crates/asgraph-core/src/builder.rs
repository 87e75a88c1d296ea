//! Graph construction from relationship records.
//!
//! # Procedure
//!
//! 1. Reject a pair that is both customer-provider and peer, and self peering.
//!    Nothing is built when validation fails.
//! 2. Create one entity per ASN seen in any link or auxiliary set, through
//!    the [`EntityFactory`].
//! 3. Flag IXP and input-clique entities.
//! 4. Wire customer/provider references in both directions.
//! 5. Wire peer references in both directions.
//! 6. Freeze every entity's sets into ascending sequences.
//!
//! Link sets are deduplicated on entry, and the final topology does not depend
//! on the order records were supplied in.

use crate::asn::Asn;
use crate::entity::{EntityDraft, EntityFactory, PlainEntities};
use crate::error::{Error, Result};
use crate::graph::AsGraph;
use crate::link::{CustomerProviderLink, PeerLink};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Assembles an [`AsGraph`] from links and auxiliary ASN sets.
///
/// # Example
///
/// ```
/// use asgraph_core::{Asn, CustomerProviderLink, GraphBuilder};
///
/// # fn main() -> asgraph_core::Result<()> {
/// let asn = |raw| Asn::new(raw);
/// let graph = GraphBuilder::new()
///     .customer_provider_links([
///         CustomerProviderLink::new(asn(2)?, asn(1)?),
///         CustomerProviderLink::new(asn(3)?, asn(2)?),
///     ])
///     .input_clique([asn(1)?])
///     .build()?;
///
/// assert_eq!(graph.get(asn(1)?).and_then(|e| e.customer_cone_size()), Some(2));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder<F = PlainEntities> {
    factory: F,
    customer_provider_links: HashSet<CustomerProviderLink>,
    peer_links: HashSet<PeerLink>,
    ixps: BTreeSet<Asn>,
    input_clique: BTreeSet<Asn>,
}

impl GraphBuilder<PlainEntities> {
    /// Builder whose entities carry no payload.
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(PlainEntities)
    }
}

impl Default for GraphBuilder<PlainEntities> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: EntityFactory> GraphBuilder<F> {
    /// Builder that creates entity payloads with `factory`.
    #[must_use]
    pub fn with_factory(factory: F) -> Self {
        Self {
            factory,
            customer_provider_links: HashSet::new(),
            peer_links: HashSet::new(),
            ixps: BTreeSet::new(),
            input_clique: BTreeSet::new(),
        }
    }

    /// Add customer-provider links.
    #[must_use]
    pub fn customer_provider_links(
        mut self,
        links: impl IntoIterator<Item = CustomerProviderLink>,
    ) -> Self {
        self.customer_provider_links.extend(links);
        self
    }

    /// Add peer links.
    #[must_use]
    pub fn peer_links(mut self, links: impl IntoIterator<Item = PeerLink>) -> Self {
        self.peer_links.extend(links);
        self
    }

    /// Add ASNs that are internet exchange points.
    #[must_use]
    pub fn ixps(mut self, asns: impl IntoIterator<Item = Asn>) -> Self {
        self.ixps.extend(asns);
        self
    }

    /// Add ASNs of the top-tier clique.
    #[must_use]
    pub fn input_clique(mut self, asns: impl IntoIterator<Item = Asn>) -> Self {
        self.input_clique.extend(asns);
        self
    }

    /// Build, rank and annotate the graph.
    ///
    /// # Errors
    ///
    /// Any error from [`build_frozen`](Self::build_frozen),
    /// [`AsGraph::assign_propagation_ranks`] or
    /// [`AsGraph::compute_customer_cones`].
    pub fn build(self) -> Result<AsGraph<F::Data>> {
        let mut graph = self.build_frozen()?;
        graph.assign_propagation_ranks()?;
        graph.compute_customer_cones()?;
        tracing::info!(
            entities = graph.len(),
            tiers = graph.propagation_ranks().map_or(0, <[_]>::len),
            "AS graph annotated"
        );
        Ok(graph)
    }

    /// Build the graph and freeze its relationships, without deriving ranks
    /// or cones.
    ///
    /// # Errors
    ///
    /// - [`Error::OverlappingLink`] when a pair is both customer-provider and peer
    /// - [`Error::SelfPeering`] for a peer link from an ASN to itself
    /// - whatever the entity factory returns
    pub fn build_frozen(self) -> Result<AsGraph<F::Data>> {
        self.validate()?;

        let Self {
            factory,
            customer_provider_links,
            peer_links,
            ixps,
            input_clique,
        } = self;

        let mut asns: BTreeSet<Asn> = BTreeSet::new();
        for link in &customer_provider_links {
            asns.extend([link.customer, link.provider]);
        }
        for link in &peer_links {
            let (low, high) = link.endpoints();
            asns.extend([low, high]);
        }
        asns.extend(ixps.iter().copied());
        asns.extend(input_clique.iter().copied());

        let mut drafts: BTreeMap<Asn, EntityDraft<F::Data>> = BTreeMap::new();
        for asn in asns {
            let data = factory.create(asn)?;
            drafts.insert(asn, EntityDraft::new(asn, data));
        }
        tracing::debug!(entities = drafts.len(), "created entities");

        for asn in &ixps {
            if let Some(draft) = drafts.get_mut(asn) {
                draft.ixp = true;
            }
        }
        for asn in &input_clique {
            if let Some(draft) = drafts.get_mut(asn) {
                draft.input_clique = true;
            }
        }

        for link in &customer_provider_links {
            if let Some(customer) = drafts.get_mut(&link.customer) {
                customer.providers.insert(link.provider);
            }
            if let Some(provider) = drafts.get_mut(&link.provider) {
                provider.customers.insert(link.customer);
            }
        }
        for link in &peer_links {
            let (low, high) = link.endpoints();
            if let Some(entity) = drafts.get_mut(&low) {
                entity.peers.insert(high);
            }
            if let Some(entity) = drafts.get_mut(&high) {
                entity.peers.insert(low);
            }
        }
        tracing::debug!(
            customer_provider = customer_provider_links.len(),
            peer = peer_links.len(),
            "added relationships"
        );

        let entities = drafts
            .into_iter()
            .map(|(asn, draft)| (asn, draft.freeze()))
            .collect();
        Ok(AsGraph::from_frozen(entities))
    }

    fn validate(&self) -> Result<()> {
        if let Some(link) = self.peer_links.iter().filter(|l| l.is_self_link()).min() {
            return Err(Error::SelfPeering {
                asn: link.endpoints().0,
            });
        }

        let customer_provider_pairs: HashSet<(Asn, Asn)> = self
            .customer_provider_links
            .iter()
            .map(CustomerProviderLink::endpoints)
            .collect();
        let overlap = self
            .peer_links
            .iter()
            .map(PeerLink::endpoints)
            .filter(|pair| customer_provider_pairs.contains(pair))
            .min();

        match overlap {
            Some((low, high)) => {
                tracing::warn!(%low, %high, "link is both customer-provider and peer");
                Err(Error::OverlappingLink { low, high })
            }
            None => Ok(()),
        }
    }
}
