//! asgraph - build AS relationship graphs from CAIDA serial-2 datasets.
//!
//! This crate provides the `asgraph` CLI and the pieces it is made of:
//! dataset parsing, tab-separated export and printable summaries. Graph
//! construction lives in `asgraph-core`, snapshots in `asgraph-snapshot`.

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod output;
pub mod summary;
