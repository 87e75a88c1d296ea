//! CLI argument structs for all commands.

use asgraph_core::Asn;
use clap::Parser;
use std::path::PathBuf;

/// Arguments for the `build` command
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Relationship dataset in serial-2 format
    pub input: PathBuf,

    /// Write a tab-separated export to this path
    #[arg(long)]
    pub tsv: Option<PathBuf>,

    /// Write a JSONL snapshot to this path
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Number of largest customer cones to list
    #[arg(long)]
    pub top: Option<usize>,
}

/// Arguments for the `tiers` command
#[derive(Parser, Debug, Clone)]
pub struct TiersArgs {
    /// Relationship dataset in serial-2 format
    pub input: PathBuf,

    /// Only print this propagation rank
    #[arg(short, long)]
    pub rank: Option<usize>,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Relationship dataset in serial-2 format
    pub input: PathBuf,

    /// ASN to display
    pub asn: Asn,
}

/// Arguments for the `inspect` command
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Snapshot written by `build --snapshot`
    pub snapshot: PathBuf,

    /// Number of largest customer cones to list
    #[arg(long)]
    pub top: Option<usize>,
}

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}
