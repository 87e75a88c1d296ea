//! Relationship records between autonomous systems.
//!
//! Records are immutable values produced by a parser. Both kinds expose their
//! endpoints as an ordered `(low, high)` pair so that a customer-provider link
//! and a peer link over the same two ASNs compare equal on that pair.

use crate::asn::Asn;

/// Directed relationship: `provider` carries traffic for `customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerProviderLink {
    /// The ASN buying transit
    pub customer: Asn,
    /// The ASN selling transit
    pub provider: Asn,
}

impl CustomerProviderLink {
    /// Create a link from `provider` down to `customer`.
    #[must_use]
    pub fn new(customer: Asn, provider: Asn) -> Self {
        Self { customer, provider }
    }

    /// Endpoints ordered ascending, independent of direction.
    #[must_use]
    pub fn endpoints(&self) -> (Asn, Asn) {
        ordered(self.customer, self.provider)
    }
}

/// Symmetric relationship between two ASes of comparable standing.
///
/// Constructed through [`PeerLink::new`], which stores the smaller ASN first,
/// so `PeerLink::new(a, b) == PeerLink::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerLink {
    low: Asn,
    high: Asn,
}

impl PeerLink {
    /// Create a peer link in canonical order.
    #[must_use]
    pub fn new(a: Asn, b: Asn) -> Self {
        let (low, high) = ordered(a, b);
        Self { low, high }
    }

    /// Endpoints ordered ascending.
    #[must_use]
    pub fn endpoints(&self) -> (Asn, Asn) {
        (self.low, self.high)
    }

    /// Returns `true` if both endpoints are the same ASN.
    #[must_use]
    pub fn is_self_link(&self) -> bool {
        self.low == self.high
    }
}

fn ordered(a: Asn, b: Asn) -> (Asn, Asn) {
    if a <= b { (a, b) } else { (b, a) }
}
