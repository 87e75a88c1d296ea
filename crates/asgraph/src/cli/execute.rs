//! Command execution logic.

use anyhow::{Context, Result};
use std::path::Path;

use super::args::{BuildArgs, InitArgs, InspectArgs, ShowArgs, TiersArgs};
use crate::commands::inspect;
use crate::config::AsgraphConfig;
use crate::dataset::{self, Dataset, FileDataset};
use crate::error::Error;
use crate::export;
use crate::output::{self, OutputMode};
use crate::summary::{self, GraphSummary};
use asgraph_core::AsGraph;
use asgraph_snapshot::{EntityRecord, Snapshot};

async fn load_graph(input: &Path) -> Result<(Dataset, AsGraph)> {
    let dataset = dataset::load(&FileDataset::new(input))
        .await
        .with_context(|| format!("failed to read dataset {}", input.display()))?;
    let graph = dataset
        .build_graph()
        .with_context(|| format!("failed to build graph from {}", input.display()))?;
    Ok((dataset, graph))
}

/// Execute the build command
pub async fn execute_build(
    args: &BuildArgs,
    config: &AsgraphConfig,
    output_mode: OutputMode,
) -> Result<()> {
    let (dataset, graph) = load_graph(&args.input).await?;

    if let Some(path) = args.tsv.as_ref().or(config.output.tsv.as_ref()) {
        export::export_tsv(path, &graph)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        output::print_written("TSV export", path, output_mode)?;
    }

    if let Some(path) = args.snapshot.as_ref().or(config.output.snapshot.as_ref()) {
        asgraph_snapshot::write_snapshot_atomic(path, &graph, Some(dataset.digest.clone()))
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        output::print_written("snapshot", path, output_mode)?;
    }

    let top = args.top.unwrap_or(config.display.top_cones);
    output::print_summary(&GraphSummary::from_graph(&graph, top), output_mode)?;
    Ok(())
}

/// Execute the tiers command
pub async fn execute_tiers(args: &TiersArgs, output_mode: OutputMode) -> Result<()> {
    let (_, graph) = load_graph(&args.input).await?;
    let tiers_count = graph.propagation_ranks()?.len();

    let tiers = summary::tiers(&graph, args.rank).ok_or_else(|| Error::RankOutOfRange {
        rank: args.rank.unwrap_or_default(),
        tiers: tiers_count,
    })?;
    output::print_tiers(&tiers, output_mode)?;
    Ok(())
}

/// Execute the show command
pub async fn execute_show(args: &ShowArgs, output_mode: OutputMode) -> Result<()> {
    let (_, graph) = load_graph(&args.input).await?;
    let entity = graph.get(args.asn).ok_or(Error::EntityNotFound(args.asn))?;

    output::print_entity(&EntityRecord::new(&graph, entity), output_mode)?;
    Ok(())
}

/// Execute the inspect command
pub async fn execute_inspect(
    args: &InspectArgs,
    config: &AsgraphConfig,
    output_mode: OutputMode,
) -> Result<()> {
    let snapshot = Snapshot::load(&args.snapshot)
        .await
        .with_context(|| format!("failed to load snapshot {}", args.snapshot.display()))?;
    let graph = inspect::rebuild_verified(&snapshot)
        .with_context(|| format!("snapshot {} failed verification", args.snapshot.display()))?;

    let top = args.top.unwrap_or(config.display.top_cones);
    output::print_snapshot(
        &snapshot.header,
        &GraphSummary::from_graph(&graph, top),
        output_mode,
    )?;
    Ok(())
}

/// Execute the init command
pub async fn execute_init(args: &InitArgs, output_mode: OutputMode) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;
    let path = init::init(&current_dir, args.force).await?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "config_file": path.display().to_string(),
        }))?,
        OutputMode::Text if !args.quiet => {
            output::print_written("default configuration", &path, output_mode)?;
        }
        OutputMode::Text => {}
    }
    Ok(())
}
