//! asgraph-core - AS relationship graph with propagation ranks and customer cones.
//!
//! Takes already-parsed customer-provider and peer records plus the IXP and
//! top-clique ASN sets, and builds an [`AsGraph`] where every entity carries:
//!
//! - a **propagation rank**: the longest customer→provider chain ending at it
//! - a **customer-cone size**: how many ASes sit transitively below it
//!
//! Construction is single-threaded and synchronous; nothing here performs
//! I/O. Fetching, parsing and exporting datasets live in the `asgraph` and
//! `asgraph-snapshot` crates.

#![forbid(unsafe_code)]

pub mod asn;
pub mod builder;
pub mod entity;
pub mod error;
pub mod graph;
pub mod link;

mod cone;
mod rank;

pub use asn::Asn;
pub use builder::GraphBuilder;
pub use entity::{Entity, EntityFactory, PlainEntities};
pub use error::{Error, Result};
pub use graph::{AsGraph, Classification, Phase};
pub use link::{CustomerProviderLink, PeerLink};
