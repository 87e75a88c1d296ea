//! Integration tests for graph construction, ranks and customer cones.
//!
//! Scenario tests pin small hand-checked topologies; property tests generate
//! random DAGs and compare the annotated graph against direct definitions.

use asgraph_core::{AsGraph, Asn, CustomerProviderLink, Error, GraphBuilder, PeerLink};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet, VecDeque};

fn asn(raw: i64) -> Asn {
    Asn::new(raw).expect("valid test ASN")
}

fn cp(provider: i64, customer: i64) -> CustomerProviderLink {
    CustomerProviderLink::new(asn(customer), asn(provider))
}

fn rank(graph: &AsGraph, id: i64) -> u32 {
    graph
        .get(asn(id))
        .and_then(|e| e.propagation_rank())
        .expect("ranked entity")
}

fn cone(graph: &AsGraph, id: i64) -> usize {
    graph
        .get(asn(id))
        .and_then(|e| e.customer_cone_size())
        .expect("annotated entity")
}

/// Transitive customer closure by breadth-first search.
fn closure(graph: &AsGraph, root: Asn) -> BTreeSet<Asn> {
    let mut seen = BTreeSet::new();
    let mut queue: VecDeque<Asn> = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        for &customer in graph.get(current).expect("entity").customers() {
            if seen.insert(customer) {
                queue.push_back(customer);
            }
        }
    }
    seen
}

// ========== Scenarios ==========

#[test]
fn scenario_chain_under_clique() {
    let graph = GraphBuilder::new()
        .customer_provider_links([cp(1, 2), cp(2, 3)])
        .input_clique([asn(1)])
        .build()
        .expect("build");

    assert_eq!((rank(&graph, 3), rank(&graph, 2), rank(&graph, 1)), (0, 1, 2));
    assert_eq!((cone(&graph, 3), cone(&graph, 2), cone(&graph, 1)), (0, 1, 2));
    assert!(graph.classification().expect("classes").is_input_clique(asn(1)));
}

#[test]
fn scenario_single_provider_stub() {
    let graph = GraphBuilder::new()
        .customer_provider_links([cp(1, 5), cp(1, 6), cp(2, 6)])
        .build()
        .expect("build");

    let five = graph.get(asn(5)).expect("entity");
    assert!(five.is_stub());
    assert_eq!(five.customer_cone_size(), Some(0));
    assert!(graph.classification().expect("classes").is_stub(asn(5)));
}

#[test]
fn scenario_disjoint_components_do_not_interfere() {
    let left = [cp(1, 2), cp(2, 3)];
    let right = [cp(10, 11), cp(10, 12), cp(11, 13)];

    let combined = GraphBuilder::new()
        .customer_provider_links(left.iter().chain(right.iter()).copied())
        .build()
        .expect("combined");
    let only_left = GraphBuilder::new()
        .customer_provider_links(left)
        .build()
        .expect("left");
    let only_right = GraphBuilder::new()
        .customer_provider_links(right)
        .build()
        .expect("right");

    for entity in only_left.iter().chain(only_right.iter()) {
        let merged = combined.get(entity.asn()).expect("present in combined");
        assert_eq!(merged.propagation_rank(), entity.propagation_rank());
        assert_eq!(merged.customer_cone_size(), entity.customer_cone_size());
    }

    let buckets = combined.propagation_ranks().expect("ranks");
    assert_eq!(buckets[0], vec![asn(3), asn(12), asn(13)]);
    assert_eq!(buckets[1], vec![asn(2), asn(11)]);
    assert_eq!(buckets[2], vec![asn(1), asn(10)]);
}

#[test]
fn overlap_leaves_nothing_observable() {
    let result = GraphBuilder::new()
        .customer_provider_links([cp(1, 2), cp(2, 3)])
        .peer_links([PeerLink::new(asn(3), asn(2))])
        .build();

    match result {
        Err(Error::OverlappingLink { low, high }) => {
            assert_eq!((low, high), (asn(2), asn(3)));
        }
        other => panic!("expected overlap error, got {other:?}"),
    }
}

#[test]
fn cycle_fails_whole_build() {
    let err = GraphBuilder::new()
        .customer_provider_links([cp(1, 2), cp(2, 3), cp(3, 1), cp(4, 1)])
        .build()
        .expect_err("cycle");

    assert!(matches!(err, Error::CycleDetected { .. }));
    assert!(err.is_data_integrity());
}

// ========== Properties ==========

/// Random DAG: edges always point from the lower index (provider) to the
/// higher index (customer); peers are drawn from the remaining pairs.
fn topology() -> impl Strategy<Value = (Vec<CustomerProviderLink>, Vec<PeerLink>)> {
    (2_i64..40)
        .prop_flat_map(|n| {
            (
                prop::collection::vec((1..=n, 1..=n), 0..80),
                prop::collection::vec((1..=n, 1..=n), 0..30),
            )
        })
        .prop_map(|(edges, peers)| {
            let links: Vec<CustomerProviderLink> = edges
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| cp(a.min(b), a.max(b)))
                .collect();
            let pairs: HashSet<(Asn, Asn)> =
                links.iter().map(CustomerProviderLink::endpoints).collect();
            let peers = peers
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| PeerLink::new(asn(a), asn(b)))
                .filter(|p| !pairs.contains(&p.endpoints()))
                .collect();
            (links, peers)
        })
}

fn build(links: &[CustomerProviderLink], peers: &[PeerLink]) -> AsGraph {
    GraphBuilder::new()
        .customer_provider_links(links.iter().copied())
        .peer_links(peers.iter().copied())
        .build()
        .expect("generated topology is a DAG")
}

proptest! {
    #[test]
    fn rank_matches_definition((links, peers) in topology()) {
        let graph = build(&links, &peers);

        for entity in &graph {
            let expected = entity
                .customers()
                .iter()
                .map(|c| graph.get(*c).and_then(|e| e.propagation_rank()).unwrap() + 1)
                .max()
                .unwrap_or(0);
            prop_assert_eq!(entity.propagation_rank(), Some(expected));
        }
    }

    #[test]
    fn cone_matches_transitive_closure((links, peers) in topology()) {
        let graph = build(&links, &peers);

        for entity in &graph {
            let expected = closure(&graph, entity.asn()).len();
            prop_assert_eq!(entity.customer_cone_size(), Some(expected));
            if entity.is_multihomed() {
                prop_assert_eq!(entity.customer_cone_size(), Some(0));
            }
        }
    }

    #[test]
    fn input_order_does_not_matter((links, peers) in topology()) {
        let forward = build(&links, &peers);
        let mut reversed_links = links.clone();
        reversed_links.reverse();
        let mut reversed_peers = peers.clone();
        reversed_peers.reverse();
        let backward = build(&reversed_links, &reversed_peers);

        prop_assert_eq!(forward.propagation_ranks().unwrap(), backward.propagation_ranks().unwrap());
        prop_assert_eq!(forward.classification().unwrap(), backward.classification().unwrap());
        for (a, b) in forward.iter().zip(backward.iter()) {
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn buckets_are_sorted_and_complete((links, peers) in topology()) {
        let graph = build(&links, &peers);
        let buckets = graph.propagation_ranks().unwrap();

        let total: usize = buckets.iter().map(Vec::len).sum();
        prop_assert_eq!(total, graph.len());
        for (tier, bucket) in buckets.iter().enumerate() {
            prop_assert!(bucket.windows(2).all(|w| w[0] < w[1]));
            for asn in bucket {
                prop_assert_eq!(graph.get(*asn).unwrap().propagation_rank(), Some(tier as u32));
            }
        }
    }
}
