//! Serializable views of an annotated graph for command output.

use asgraph_core::{AsGraph, Asn};
use serde::Serialize;

/// Headline numbers for one graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    /// Number of entities
    pub entities: usize,
    /// Number of propagation-rank tiers
    pub tiers: usize,
    /// Classification set sizes
    pub classes: ClassCounts,
    /// IXP entities
    pub ixps: usize,
    /// Largest customer cones, biggest first
    pub largest_cones: Vec<ConeEntry>,
}

/// Sizes of the classification sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    /// Stub entities
    pub stubs: usize,
    /// Multihomed entities
    pub multihomed: usize,
    /// Top-clique entities
    pub input_clique: usize,
    /// Everything else
    pub other: usize,
}

/// One entity with its cone size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConeEntry {
    /// The entity
    pub asn: Asn,
    /// Its customer-cone size
    pub customer_cone_size: usize,
}

/// One propagation tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tier {
    /// Propagation rank of every member
    pub rank: usize,
    /// Members, ascending
    pub asns: Vec<Asn>,
}

impl GraphSummary {
    /// Summarise an annotated graph, listing at most `top` cones.
    ///
    /// Class counts are zero and tiers empty for graphs that are not yet
    /// annotated.
    #[must_use]
    pub fn from_graph<D>(graph: &AsGraph<D>, top: usize) -> Self {
        let classes = graph
            .classification()
            .map(|c| ClassCounts {
                stubs: c.stubs().len(),
                multihomed: c.multihomed().len(),
                input_clique: c.input_clique().len(),
                other: c.other().len(),
            })
            .unwrap_or_default();

        Self {
            entities: graph.len(),
            tiers: graph.propagation_ranks().map_or(0, <[_]>::len),
            classes,
            ixps: graph.iter().filter(|e| e.is_ixp()).count(),
            largest_cones: largest_cones(graph, top),
        }
    }
}

/// The `top` largest customer cones, ties broken by ascending ASN.
#[must_use]
pub fn largest_cones<D>(graph: &AsGraph<D>, top: usize) -> Vec<ConeEntry> {
    let mut cones: Vec<ConeEntry> = graph
        .iter()
        .filter_map(|e| {
            e.customer_cone_size().map(|size| ConeEntry {
                asn: e.asn(),
                customer_cone_size: size,
            })
        })
        .collect();
    cones.sort_by(|a, b| {
        b.customer_cone_size
            .cmp(&a.customer_cone_size)
            .then(a.asn.cmp(&b.asn))
    });
    cones.truncate(top);
    cones
}

/// Every tier, or only `rank` when given.
///
/// Returns `None` when `rank` is past the last tier, or the graph is not ranked.
#[must_use]
pub fn tiers<D>(graph: &AsGraph<D>, rank: Option<usize>) -> Option<Vec<Tier>> {
    let buckets = graph.propagation_ranks().ok()?;
    let tier = |(rank, asns): (usize, &Vec<Asn>)| Tier {
        rank,
        asns: asns.clone(),
    };
    match rank {
        Some(r) => buckets.get(r).map(|asns| vec![tier((r, asns))]),
        None => Some(buckets.iter().enumerate().map(tier).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asgraph_core::{CustomerProviderLink, GraphBuilder, PeerLink};

    fn asn(raw: i64) -> Asn {
        Asn::new(raw).unwrap()
    }

    fn graph() -> AsGraph {
        GraphBuilder::new()
            .customer_provider_links([
                CustomerProviderLink::new(asn(2), asn(1)),
                CustomerProviderLink::new(asn(3), asn(2)),
                CustomerProviderLink::new(asn(5), asn(4)),
            ])
            .peer_links([PeerLink::new(asn(6), asn(1)), PeerLink::new(asn(6), asn(4))])
            .ixps([asn(6)])
            .input_clique([asn(1)])
            .build()
            .unwrap()
    }

    #[test]
    fn summary_counts_classes() {
        let summary = GraphSummary::from_graph(&graph(), 2);

        assert_eq!(summary.entities, 6);
        assert_eq!(summary.tiers, 3);
        assert_eq!(summary.ixps, 1);
        assert_eq!(summary.classes.input_clique, 1);
        assert_eq!(summary.classes.multihomed, 1);
        assert_eq!(
            summary.largest_cones,
            vec![
                ConeEntry {
                    asn: asn(1),
                    customer_cone_size: 2
                },
                ConeEntry {
                    asn: asn(2),
                    customer_cone_size: 1
                },
            ]
        );
    }

    #[test]
    fn cone_ties_break_by_asn() {
        let cones = largest_cones(&graph(), 10);

        let ones: Vec<Asn> = cones
            .iter()
            .filter(|c| c.customer_cone_size == 1)
            .map(|c| c.asn)
            .collect();
        assert_eq!(ones, vec![asn(2), asn(4)]);
    }

    #[test]
    fn single_tier_selection() {
        let graph = graph();

        assert_eq!(
            tiers(&graph, Some(2)),
            Some(vec![Tier {
                rank: 2,
                asns: vec![asn(1)]
            }])
        );
        assert_eq!(tiers(&graph, Some(3)), None);
        assert_eq!(tiers(&graph, None).map(|t| t.len()), Some(3));
    }
}
