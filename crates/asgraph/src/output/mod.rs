//! Output formatting for CLI commands.
//!
//! Every printer comes in a text flavour, written against any [`Write`] so
//! tests can capture it, and a JSON flavour for programmatic use.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers

pub mod color;

use crate::summary::{GraphSummary, Tier};
use asgraph_core::Asn;
use asgraph_snapshot::{EntityRecord, SnapshotHeader};
use serde::Serialize;
use std::env;
use std::io::{self, Write};
use std::path::Path;

pub use color::{error, success};

use color::{bold, colorize_asn, dimmed, number};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 100;

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Configuration for text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_colors: bool) -> Self {
        Self {
            max_width,
            use_colors,
        }
    }

    /// Create an `OutputConfig` from the process environment.
    ///
    /// Reads:
    /// - `ASGRAPH_MAX_WIDTH`: Maximum content width (default: 100)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `ASGRAPH_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Create an `OutputConfig` from a variable lookup.
    #[must_use]
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let max_width = match var("ASGRAPH_MAX_WIDTH") {
            Some(s) if !s.is_empty() => s.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    env_var = "ASGRAPH_MAX_WIDTH",
                    value = %s,
                    default = DEFAULT_MAX_CONTENT_WIDTH,
                    "Invalid value, using default"
                );
                DEFAULT_MAX_CONTENT_WIDTH
            }),
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        // https://no-color.org/
        let use_colors = var("NO_COLOR").is_none()
            && var("ASGRAPH_COLOR").is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            max_width,
            use_colors,
        }
    }

    /// Width available for wrapped content on this terminal.
    #[must_use]
    pub fn content_width(&self) -> usize {
        get_terminal_width().min(self.max_width)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_colors: true,
        }
    }
}

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size().map_or(usize::from(DEFAULT_TERMINAL_WIDTH), |(w, _)| {
        usize::from(w.0)
    })
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print a build or inspect summary.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_summary(summary: &GraphSummary, mode: OutputMode) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => write_summary(&mut handle, summary, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, summary),
    }
}

/// Print propagation tiers.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_tiers(tiers: &[Tier], mode: OutputMode) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            write_tiers(&mut handle, tiers, &config, config.content_width())
        }
        OutputMode::Json => write_json(&mut handle, &tiers),
    }
}

/// Print one entity.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_entity(record: &EntityRecord, mode: OutputMode) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            write_entity(&mut handle, record, &config, config.content_width())
        }
        OutputMode::Json => write_json(&mut handle, record),
    }
}

/// Print a stored snapshot's header together with its summary.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_snapshot(
    header: &SnapshotHeader,
    summary: &GraphSummary,
    mode: OutputMode,
) -> io::Result<()> {
    #[derive(Serialize)]
    struct SnapshotView<'a> {
        header: &'a SnapshotHeader,
        summary: &'a GraphSummary,
    }

    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            write_snapshot_header(&mut handle, header, &config)?;
            writeln!(handle)?;
            write_summary(&mut handle, summary, &config)
        }
        OutputMode::Json => write_json(&mut handle, &SnapshotView { header, summary }),
    }
}

/// Print a note that a file was written, in text mode only.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_written(what: &str, path: &Path, mode: OutputMode) -> io::Result<()> {
    if mode == OutputMode::Json {
        return Ok(());
    }
    let config = OutputConfig::from_env();
    let mut handle = io::stdout().lock();
    writeln!(
        handle,
        "{} {what} to {}",
        success("Wrote", &config),
        path.display()
    )
}

/// Print a JSON-formatted result for any serializable value
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    write_json(&mut io::stdout().lock(), value)
}

// ============================================================================
// Text Formatting
// ============================================================================

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

fn write_summary<W: Write>(
    w: &mut W,
    summary: &GraphSummary,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", bold("AS graph", config))?;
    writeln!(
        w,
        "  {} {}",
        dimmed("Entities:    ", config),
        number(summary.entities, config)
    )?;
    writeln!(
        w,
        "  {} {}",
        dimmed("Tiers:       ", config),
        number(summary.tiers, config)
    )?;
    writeln!(
        w,
        "  {} {}",
        dimmed("IXPs:        ", config),
        number(summary.ixps, config)
    )?;
    writeln!(
        w,
        "  {} {} stub, {} multihomed, {} input clique, {} other",
        dimmed("Classes:     ", config),
        number(summary.classes.stubs, config),
        number(summary.classes.multihomed, config),
        number(summary.classes.input_clique, config),
        number(summary.classes.other, config)
    )?;

    if summary.largest_cones.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}", bold("Largest customer cones", config))?;
    for entry in &summary.largest_cones {
        writeln!(
            w,
            "  {:<12} {}",
            colorize_asn(entry.asn, config),
            number(entry.customer_cone_size, config)
        )?;
    }
    Ok(())
}

fn write_tiers<W: Write>(
    w: &mut W,
    tiers: &[Tier],
    config: &OutputConfig,
    width: usize,
) -> io::Result<()> {
    if tiers.is_empty() {
        writeln!(w, "No tiers.")?;
        return Ok(());
    }

    for tier in tiers {
        writeln!(
            w,
            "{} {} ({} ASes)",
            bold("Rank", config),
            number(tier.rank, config),
            tier.asns.len()
        )?;
        for line in wrap_asns(&tier.asns, width) {
            writeln!(w, "{line}")?;
        }
    }
    Ok(())
}

fn write_entity<W: Write>(
    w: &mut W,
    record: &EntityRecord,
    config: &OutputConfig,
    width: usize,
) -> io::Result<()> {
    let flag = |set: bool, name: &'static str| set.then_some(name);
    let flags: Vec<&str> = [
        flag(record.input_clique, "input clique"),
        flag(record.ixp, "ixp"),
        flag(record.stub, "stub"),
        flag(record.multihomed, "multihomed"),
        flag(record.transit, "transit"),
    ]
    .into_iter()
    .flatten()
    .collect();

    writeln!(w, "{}", colorize_asn(record.asn, config))?;
    if !flags.is_empty() {
        writeln!(w, "  {} {}", dimmed("Flags:", config), flags.join(", "))?;
    }
    writeln!(
        w,
        "  {} {}",
        dimmed("Propagation rank:  ", config),
        record
            .propagation_rank
            .map_or_else(|| "-".to_string(), |r| number(r, config))
    )?;
    writeln!(
        w,
        "  {} {}",
        dimmed("Customer cone size:", config),
        record
            .customer_cone_size
            .map_or_else(|| "-".to_string(), |c| number(c, config))
    )?;

    for (title, asns) in [
        ("Providers", &record.providers),
        ("Customers", &record.customers),
        ("Peers", &record.peers),
        ("Stub customers", &record.stubs),
    ] {
        if asns.is_empty() {
            continue;
        }
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold(title, config), asns.len())?;
        for line in wrap_asns(asns, width) {
            writeln!(w, "{line}")?;
        }
    }
    Ok(())
}

fn write_snapshot_header<W: Write>(
    w: &mut W,
    header: &SnapshotHeader,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", bold("Snapshot", config))?;
    writeln!(
        w,
        "  {} {}",
        dimmed("Format version:", config),
        header.format_version
    )?;
    writeln!(
        w,
        "  {} {}",
        dimmed("Generated at:  ", config),
        header.generated_at.to_rfc3339()
    )?;
    if let Some(digest) = &header.source_digest {
        writeln!(w, "  {} {digest}", dimmed("Source sha256: ", config))?;
    }
    Ok(())
}

/// Space-separated ASNs wrapped to `width`, each line indented two spaces.
fn wrap_asns(asns: &[Asn], width: usize) -> Vec<String> {
    let text = asns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let options = textwrap::Options::new(width.max(8))
        .initial_indent("  ")
        .subsequent_indent("  ");
    textwrap::wrap(&text, options)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}
