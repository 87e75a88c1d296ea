//! Tab-separated export of an annotated graph.
//!
//! One header row, then one row per entity ascending by ASN. ASN lists are
//! written as `{1,2,3}`, missing values as empty cells.

use crate::error::Result;
use asgraph_core::{AsGraph, Asn};
use asgraph_snapshot::{records, EntityRecord};
use std::fmt::Write as _;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Column names, in output order.
pub const COLUMNS: [&str; 12] = [
    "asn",
    "peers",
    "customers",
    "providers",
    "input_clique",
    "ixp",
    "customer_cone_size",
    "propagation_rank",
    "stubs",
    "stub",
    "multihomed",
    "transit",
];

/// Render one record as a TSV row, without the line terminator.
#[must_use]
pub fn tsv_row(record: &EntityRecord) -> String {
    [
        record.asn.to_string(),
        asn_list(&record.peers),
        asn_list(&record.customers),
        asn_list(&record.providers),
        record.input_clique.to_string(),
        record.ixp.to_string(),
        optional(record.customer_cone_size),
        optional(record.propagation_rank),
        asn_list(&record.stubs),
        record.stub.to_string(),
        record.multihomed.to_string(),
        record.transit.to_string(),
    ]
    .join("\t")
}

/// Write the header and every entity row to `writer`.
///
/// Returns the number of entity rows written.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub async fn write_tsv<D, W>(graph: &AsGraph<D>, writer: W) -> Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = BufWriter::new(writer);
    let mut rows = 0;

    writer.write_all(COLUMNS.join("\t").as_bytes()).await?;
    writer.write_all(b"\n").await?;
    for record in records(graph) {
        let mut line = tsv_row(&record);
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        rows += 1;
    }
    writer.flush().await?;
    Ok(rows)
}

/// Write the TSV export to a file at `path`, replacing it.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub async fn export_tsv<D>(path: &Path, graph: &AsGraph<D>) -> Result<usize> {
    let file = File::create(path).await?;
    let rows = write_tsv(graph, file).await?;
    tracing::info!(path = %path.display(), rows, "wrote TSV export");
    Ok(rows)
}

fn asn_list(asns: &[Asn]) -> String {
    let mut out = String::from("{");
    for (i, asn) in asns.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{asn}");
    }
    out.push('}');
    out
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
