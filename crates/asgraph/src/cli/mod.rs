//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `build`: Parse a dataset, build the graph, print a summary and write exports
//! - `tiers`: Print propagation-rank tiers
//! - `show`: Print one entity
//! - `inspect`: Summarise a stored snapshot
//! - `init`: Write a default `asgraph.yaml`
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--config PATH`: Configuration file (default: `./asgraph.yaml` when present)
//! - `-v`: More log output on stderr (repeatable)
//!
//! # Example
//!
//! ```bash
//! asgraph build 20240101.as-rel2.txt --tsv graph.tsv --snapshot graph.jsonl
//! asgraph tiers 20240101.as-rel2.txt --rank 0
//! asgraph show 20240101.as-rel2.txt 174
//! asgraph --json inspect graph.jsonl
//! ```

mod args;
mod execute;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{BuildArgs, InitArgs, InspectArgs, ShowArgs, TiersArgs};

/// asgraph - AS relationship graphs with propagation ranks and customer cones
///
/// Reads CAIDA serial-2 relationship datasets, ranks every AS by its longest
/// customer chain and counts its customer cone.
#[derive(Parser, Debug)]
#[command(name = "asgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the graph from a dataset
    ///
    /// Prints entity, tier and class counts with the largest customer cones,
    /// and writes a TSV export and/or snapshot when asked to.
    Build(BuildArgs),

    /// Print propagation-rank tiers
    ///
    /// Rank 0 holds every AS without customers; each higher tier sits one
    /// step above its deepest customer.
    Tiers(TiersArgs),

    /// Show one AS with its relationships and metrics
    Show(ShowArgs),

    /// Summarise a stored snapshot
    ///
    /// Rebuilds the graph from the snapshot's relationships and fails if any
    /// stored record disagrees with the rebuilt one.
    Inspect(InspectArgs),

    /// Write a default configuration file
    ///
    /// Creates `asgraph.yaml` in the current directory.
    Init(InitArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Default log filter for the requested verbosity.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "asgraph=info,asgraph_core=info,asgraph_snapshot=info",
            1 => "asgraph=debug,asgraph_core=debug,asgraph_snapshot=debug",
            _ => "trace",
        }
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Any error from loading configuration or from the command itself.
    pub async fn execute(&self) -> Result<()> {
        use crate::config::AsgraphConfig;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Commands::Init(args) => execute::execute_init(args, output_mode).await,
            Commands::Tiers(args) => execute::execute_tiers(args, output_mode).await,
            Commands::Show(args) => execute::execute_show(args, output_mode).await,
            Commands::Build(args) => {
                let config =
                    AsgraphConfig::resolve(self.config.as_deref(), &std::env::current_dir()?)
                        .await?;
                execute::execute_build(args, &config, output_mode).await
            }
            Commands::Inspect(args) => {
                let config =
                    AsgraphConfig::resolve(self.config.as_deref(), &std::env::current_dir()?)
                        .await?;
                execute::execute_inspect(args, &config, output_mode).await
            }
        }
    }
}
