//! The annotated AS graph and its classification sets.
//!
//! [`AsGraph`] owns every [`Entity`] in an ASN-keyed arena and tracks which
//! construction phase it has reached:
//!
//! ```text
//! Frozen ──assign_propagation_ranks──▶ Ranked ──compute_customer_cones──▶ Annotated
//! ```
//!
//! Outputs of a phase are only handed out once that phase has run; asking
//! earlier fails with [`Error::ConstructionOrder`].

use crate::asn::Asn;
use crate::cone::ConeCalculator;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::rank;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Construction phase of an [`AsGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Relationships are frozen; no derived metrics yet.
    Frozen,
    /// Propagation ranks are assigned and bucketed.
    Ranked,
    /// Customer cones are computed and classification sets derived.
    Annotated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frozen => write!(f, "frozen"),
            Self::Ranked => write!(f, "ranked"),
            Self::Annotated => write!(f, "annotated"),
        }
    }
}

/// Classification of every ASN in an annotated graph.
///
/// `stubs`, `multihomed` and `input_clique` may overlap; `other` holds the
/// ASNs that are in none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    stubs: HashSet<Asn>,
    multihomed: HashSet<Asn>,
    input_clique: HashSet<Asn>,
    other: HashSet<Asn>,
}

impl Classification {
    fn derive<D>(entities: &BTreeMap<Asn, Entity<D>>) -> Self {
        let mut classes = Self::default();
        for (&asn, entity) in entities {
            let mut classified = false;
            if entity.is_stub() {
                classes.stubs.insert(asn);
                classified = true;
            }
            if entity.is_multihomed() {
                classes.multihomed.insert(asn);
                classified = true;
            }
            if entity.is_input_clique() {
                classes.input_clique.insert(asn);
                classified = true;
            }
            if !classified {
                classes.other.insert(asn);
            }
        }
        classes
    }

    /// ASNs with exactly one relationship.
    #[must_use]
    pub fn stubs(&self) -> &HashSet<Asn> {
        &self.stubs
    }

    /// ASNs with no customers and more than one peer or provider.
    #[must_use]
    pub fn multihomed(&self) -> &HashSet<Asn> {
        &self.multihomed
    }

    /// ASNs flagged as top-tier clique members.
    #[must_use]
    pub fn input_clique(&self) -> &HashSet<Asn> {
        &self.input_clique
    }

    /// ASNs in none of the other sets.
    #[must_use]
    pub fn other(&self) -> &HashSet<Asn> {
        &self.other
    }

    /// O(1) stub membership.
    #[must_use]
    pub fn is_stub(&self, asn: Asn) -> bool {
        self.stubs.contains(&asn)
    }

    /// O(1) multihomed membership.
    #[must_use]
    pub fn is_multihomed(&self, asn: Asn) -> bool {
        self.multihomed.contains(&asn)
    }

    /// O(1) clique membership.
    #[must_use]
    pub fn is_input_clique(&self, asn: Asn) -> bool {
        self.input_clique.contains(&asn)
    }

    /// O(1) membership in the residual set.
    #[must_use]
    pub fn is_other(&self, asn: Asn) -> bool {
        self.other.contains(&asn)
    }
}

/// AS relationship graph.
///
/// Built by [`GraphBuilder`](crate::builder::GraphBuilder). Iteration is
/// always ascending by ASN.
#[derive(Debug, Clone)]
pub struct AsGraph<D = ()> {
    entities: BTreeMap<Asn, Entity<D>>,
    phase: Phase,
    propagation_ranks: Vec<Vec<Asn>>,
    classification: Option<Classification>,
}

impl<D> AsGraph<D> {
    pub(crate) fn from_frozen(entities: BTreeMap<Asn, Entity<D>>) -> Self {
        Self {
            entities,
            phase: Phase::Frozen,
            propagation_ranks: Vec::new(),
            classification: None,
        }
    }

    /// The phase this graph has reached.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the graph has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up one entity.
    #[must_use]
    pub fn get(&self, asn: Asn) -> Option<&Entity<D>> {
        self.entities.get(&asn)
    }

    /// Returns `true` if `asn` is in the graph.
    #[must_use]
    pub fn contains(&self, asn: Asn) -> bool {
        self.entities.contains_key(&asn)
    }

    /// Entities in ascending ASN order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Entity<D>> + '_ {
        self.entities.values()
    }

    /// ASNs in ascending order.
    pub fn asns(&self) -> impl ExactSizeIterator<Item = Asn> + '_ {
        self.entities.keys().copied()
    }

    /// Customers of `asn` that are themselves stubs, ascending.
    ///
    /// Empty if `asn` is not in the graph.
    #[must_use]
    pub fn stub_customers(&self, asn: Asn) -> Vec<Asn> {
        self.get(asn)
            .map(|entity| {
                entity
                    .customers()
                    .iter()
                    .copied()
                    .filter(|customer| self.get(*customer).is_some_and(Entity::is_stub))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// ASNs bucketed by propagation rank.
    ///
    /// Index `r` holds every ASN of rank `r`, ascending. Processing buckets in
    /// order walks the graph tier by tier from the edge to the core.
    ///
    /// # Errors
    ///
    /// [`Error::ConstructionOrder`] before ranks are assigned.
    pub fn propagation_ranks(&self) -> Result<&[Vec<Asn>]> {
        self.require(Phase::Ranked, "propagation_ranks")?;
        Ok(&self.propagation_ranks)
    }

    /// Stub / multihomed / clique / other sets.
    ///
    /// # Errors
    ///
    /// [`Error::ConstructionOrder`] before cones are computed.
    pub fn classification(&self) -> Result<&Classification> {
        self.require(Phase::Annotated, "classification")?;
        self.classification
            .as_ref()
            .ok_or_else(|| Error::construction_order("classification", Phase::Annotated))
    }

    /// Assign a propagation rank to every entity and bucket them.
    ///
    /// # Errors
    ///
    /// - [`Error::ConstructionOrder`] unless the graph is exactly `Frozen`
    /// - [`Error::CycleDetected`] if the customer→provider relation has a cycle
    pub fn assign_propagation_ranks(&mut self) -> Result<()> {
        if self.phase != Phase::Frozen {
            return Err(Error::construction_order(
                "assign_propagation_ranks",
                Phase::Frozen,
            ));
        }
        self.propagation_ranks = rank::assign(&mut self.entities)?;
        self.phase = Phase::Ranked;
        tracing::debug!(tiers = self.propagation_ranks.len(), "assigned propagation ranks");
        Ok(())
    }

    /// Compute every entity's customer-cone size, then derive the
    /// classification sets.
    ///
    /// # Errors
    ///
    /// - [`Error::ConstructionOrder`] unless the graph is exactly `Ranked`
    /// - [`Error::CycleDetected`] if a customer chain loops back on itself
    pub fn compute_customer_cones(&mut self) -> Result<()> {
        if self.phase != Phase::Ranked {
            return Err(Error::construction_order(
                "compute_customer_cones",
                Phase::Ranked,
            ));
        }

        let sizes = {
            let mut calculator = ConeCalculator::new(&self.entities);
            let mut sizes = Vec::with_capacity(self.entities.len());
            for &asn in self.entities.keys() {
                sizes.push((asn, calculator.cone_size(asn)?));
            }
            tracing::debug!(memoized = calculator.cached(), "customer cones complete");
            sizes
        };
        for (asn, size) in sizes {
            if let Some(entity) = self.entities.get_mut(&asn) {
                entity.set_customer_cone_size(size);
            }
        }

        self.classification = Some(Classification::derive(&self.entities));
        self.phase = Phase::Annotated;
        Ok(())
    }

    fn require(&self, required: Phase, operation: &'static str) -> Result<()> {
        if self.phase < required {
            return Err(Error::construction_order(operation, required));
        }
        Ok(())
    }
}

impl<'a, D> IntoIterator for &'a AsGraph<D> {
    type Item = &'a Entity<D>;
    type IntoIter = std::collections::btree_map::Values<'a, Asn, Entity<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.values()
    }
}
