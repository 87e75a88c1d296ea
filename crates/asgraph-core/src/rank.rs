//! Propagation ranks.
//!
//! `rank(X) = 0` when X has no customers, otherwise
//! `1 + max(rank(C) for C in customers(X))`: the length of the longest
//! customer→provider chain that ends at X.
//!
//! Ranks are relaxed along customer→provider edges in topological order, so
//! every entity's customers are final before its own value is read. One pass
//! reaches the same fixpoint as seeding a relaxation wave from every entity.
//! petgraph's `toposort` validates acyclicity first and names a node on the
//! cycle when there is one.

use crate::asn::Asn;
use crate::entity::Entity;
use crate::error::{Error, Result};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};

/// Assign ranks to every entity and return the rank buckets.
///
/// Bucket `r` lists the ASNs of rank `r` in ascending order.
pub(crate) fn assign<D>(entities: &mut BTreeMap<Asn, Entity<D>>) -> Result<Vec<Vec<Asn>>> {
    let ranks = compute(entities)?;

    let tiers = ranks.values().copied().max().map_or(0, |max| max as usize + 1);
    let mut buckets: Vec<Vec<Asn>> = vec![Vec::new(); tiers];
    // BTreeMap iteration is ascending, so each bucket comes out sorted.
    for (asn, entity) in entities.iter_mut() {
        let rank = ranks.get(asn).copied().unwrap_or(0);
        entity.set_propagation_rank(rank);
        buckets[rank as usize].push(*asn);
    }
    Ok(buckets)
}

/// Compute ranks without touching the entities.
fn compute<D>(entities: &BTreeMap<Asn, Entity<D>>) -> Result<HashMap<Asn, u32>> {
    let edge_count: usize = entities.values().map(|e| e.providers().len()).sum();
    let mut dag: DiGraphMap<Asn, ()> = DiGraphMap::with_capacity(entities.len(), edge_count);

    // Edges point customer -> provider.
    for (&asn, entity) in entities {
        dag.add_node(asn);
        for &provider in entity.providers() {
            if provider == asn {
                return Err(Error::CycleDetected { asn });
            }
            dag.add_edge(asn, provider, ());
        }
    }

    let order = toposort(&dag, None).map_err(|cycle| {
        let asn = cycle.node_id();
        tracing::warn!(%asn, "customer-provider relation is not a DAG");
        Error::CycleDetected { asn }
    })?;

    let mut ranks: HashMap<Asn, u32> = HashMap::with_capacity(entities.len());
    for asn in order {
        let rank = *ranks.entry(asn).or_insert(0);
        for provider in dag.neighbors_directed(asn, Direction::Outgoing) {
            let candidate = rank + 1;
            let slot = ranks.entry(provider).or_insert(0);
            if *slot < candidate {
                *slot = candidate;
            }
        }
    }
    Ok(ranks)
}
