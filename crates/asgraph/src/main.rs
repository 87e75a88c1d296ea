//! asgraph CLI binary.

use std::process::ExitCode;

use asgraph::cli::Cli;
use asgraph::output::{self, OutputConfig};
use tracing_subscriber::EnvFilter;

/// Main entry point for the asgraph CLI.
///
/// Uses tokio's `current_thread` runtime; every command is sequential I/O
/// followed by synchronous graph work.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // RUST_LOG overrides -v. Logs go to stderr so --json output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting asgraph CLI");

    match cli.execute().await {
        Ok(()) => {
            tracing::debug!("asgraph CLI completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let config = OutputConfig::from_env();
            eprintln!("{}: {e:#}", output::error("error", &config));
            ExitCode::FAILURE
        }
    }
}
