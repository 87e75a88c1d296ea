//! Customer cones.
//!
//! The customer cone of X is every AS reachable from X through one or more
//! customer hops, excluding X. Descendant sets are memoized per ASN so that
//! convergent topologies (many providers above the same subtree) resolve each
//! subtree once. The traversal keeps its own stack instead of recursing.

use crate::asn::Asn;
use crate::entity::Entity;
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap, HashSet};

enum Visit {
    Enter(Asn),
    Exit(Asn),
}

/// Memoized descendant-set resolver over a frozen entity arena.
pub(crate) struct ConeCalculator<'g, D> {
    entities: &'g BTreeMap<Asn, Entity<D>>,
    cache: HashMap<Asn, HashSet<Asn>>,
    in_progress: HashSet<Asn>,
}

impl<'g, D> ConeCalculator<'g, D> {
    pub(crate) fn new(entities: &'g BTreeMap<Asn, Entity<D>>) -> Self {
        Self {
            entities,
            cache: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Number of memoized descendant sets.
    pub(crate) fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Size of `asn`'s customer cone.
    ///
    /// Entities without customers (every multihomed AS, and stubs whose one
    /// relationship is upward or sideways) answer 0 without touching the cache.
    pub(crate) fn cone_size(&mut self, asn: Asn) -> Result<usize> {
        match self.entities.get(&asn) {
            Some(entity) if entity.customers().is_empty() => Ok(0),
            Some(_) => self.descendants(asn).map(HashSet::len),
            None => Ok(0),
        }
    }

    /// Every ASN below `asn` in the customer relation.
    pub(crate) fn descendants(&mut self, asn: Asn) -> Result<&HashSet<Asn>> {
        if !self.cache.contains_key(&asn) {
            self.resolve(asn)?;
        }
        self.cache
            .get(&asn)
            .ok_or(Error::CycleDetected { asn })
    }

    /// Post-order walk from `root` that fills the cache bottom-up.
    fn resolve(&mut self, root: Asn) -> Result<()> {
        let mut stack = vec![Visit::Enter(root)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(asn) => {
                    if self.cache.contains_key(&asn) {
                        continue;
                    }
                    // Still on the current path: a customer chain led back here.
                    if !self.in_progress.insert(asn) {
                        return Err(Error::CycleDetected { asn });
                    }
                    stack.push(Visit::Exit(asn));
                    for &customer in self.customers(asn).iter().rev() {
                        if !self.cache.contains_key(&customer) {
                            stack.push(Visit::Enter(customer));
                        }
                    }
                }
                Visit::Exit(asn) => {
                    let mut reachable = HashSet::new();
                    for &customer in self.customers(asn) {
                        reachable.insert(customer);
                        if let Some(below) = self.cache.get(&customer) {
                            reachable.extend(below.iter().copied());
                        }
                    }
                    self.in_progress.remove(&asn);
                    self.cache.insert(asn, reachable);
                }
            }
        }
        Ok(())
    }

    fn customers(&self, asn: Asn) -> &'g [Asn] {
        let entities: &'g BTreeMap<Asn, Entity<D>> = self.entities;
        entities.get(&asn).map_or(&[][..], Entity::customers)
    }
}
