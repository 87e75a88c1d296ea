//! Error types for graph construction and annotation.
//!
//! Every error is fatal to the current build attempt. The core never repairs
//! input: a malformed topology is a precondition violation, so the caller
//! discards the snapshot and retries with corrected records.
//!
//! Errors fall into three groups:
//! - **Data integrity**: the records contradict each other (overlapping
//!   links, self peering, cycles in the customer→provider relation)
//! - **Invalid identifier**: an ASN that is not a positive integer
//! - **Construction order**: a phase's output was requested before it ran

use crate::asn::Asn;
use crate::graph::Phase;
use thiserror::Error;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for graph construction and annotation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The same unordered pair appears as both a customer-provider link and a
    /// peer link.
    #[error("link {low}-{high} is both customer-provider and peer")]
    OverlappingLink {
        /// Smaller ASN of the pair
        low: Asn,
        /// Larger ASN of the pair
        high: Asn,
    },

    /// A peer link joins an ASN to itself.
    #[error("AS{asn} is listed as its own peer")]
    SelfPeering {
        /// The offending ASN
        asn: Asn,
    },

    /// The customer→provider relation is not a DAG.
    #[error("cycle detected in customer-provider relation at AS{asn}")]
    CycleDetected {
        /// An ASN that lies on the cycle
        asn: Asn,
    },

    /// An identifier is not a positive integer in the ASN range.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// An operation needs the output of a phase that has not run yet.
    #[error("{operation} requires the graph to be {required}")]
    ConstructionOrder {
        /// The operation that was attempted
        operation: &'static str,
        /// The phase the graph must have reached
        required: Phase,
    },
}

impl Error {
    /// Returns `true` if the error reports contradictory or cyclic input.
    #[must_use]
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::OverlappingLink { .. } | Self::SelfPeering { .. } | Self::CycleDetected { .. }
        )
    }

    pub(crate) fn construction_order(operation: &'static str, required: Phase) -> Self {
        Self::ConstructionOrder {
            operation,
            required,
        }
    }
}
