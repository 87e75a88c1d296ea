//! Relationship datasets in CAIDA's serial-2 text format.
//!
//! ```text
//! # input clique: 174 209 286
//! # IXP ASes: 1200 4635
//! 174|64500|-1
//! 174|3356|0|bgp
//! ```
//!
//! `<provider>|<customer>|-1[|<source>]` lines are customer-provider links,
//! `<peer>|<peer>|0[|<source>]` lines are peer links. The clique and IXP
//! comment lines list ASNs separated by whitespace; every other comment and
//! blank line is ignored.

use crate::error::{Error, Result};
use asgraph_core::{AsGraph, Asn, CustomerProviderLink, GraphBuilder, PeerLink};
use asgraph_snapshot::source_digest;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const INPUT_CLIQUE_PREFIX: &str = "input clique";
const IXP_PREFIX: &str = "IXP ASes";

/// Where dataset text comes from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Human-readable origin, used in logs and errors.
    fn describe(&self) -> String;

    /// Read the whole dataset as text.
    async fn read_text(&self) -> Result<String>;
}

/// A dataset stored in a local file.
#[derive(Debug, Clone)]
pub struct FileDataset {
    path: PathBuf,
}

impl FileDataset {
    /// Dataset at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetSource for FileDataset {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_text(&self) -> Result<String> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

/// Parsed relationship records and auxiliary ASN sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Customer-provider links, in file order
    pub customer_provider: Vec<CustomerProviderLink>,
    /// Peer links, in file order
    pub peers: Vec<PeerLink>,
    /// IXP ASNs
    pub ixps: BTreeSet<Asn>,
    /// Top-clique ASNs
    pub input_clique: BTreeSet<Asn>,
    /// Lowercase hex SHA-256 of the text
    pub digest: String,
}

impl Dataset {
    /// Parse serial-2 text.
    ///
    /// # Errors
    ///
    /// [`Error::Dataset`] naming the first line that is not a comment, blank,
    /// or well-formed relationship.
    pub fn parse(text: &str) -> Result<Self> {
        let mut dataset = Self {
            digest: source_digest(text.as_bytes()),
            ..Self::default()
        };

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                dataset.parse_comment(comment.trim_start(), line_number)?;
                continue;
            }
            dataset.parse_relationship(line, line_number)?;
        }

        tracing::debug!(
            customer_provider = dataset.customer_provider.len(),
            peers = dataset.peers.len(),
            ixps = dataset.ixps.len(),
            input_clique = dataset.input_clique.len(),
            "parsed dataset"
        );
        Ok(dataset)
    }

    /// A graph builder loaded with this dataset.
    #[must_use]
    pub fn builder(&self) -> GraphBuilder {
        GraphBuilder::new()
            .customer_provider_links(self.customer_provider.iter().copied())
            .peer_links(self.peers.iter().copied())
            .ixps(self.ixps.iter().copied())
            .input_clique(self.input_clique.iter().copied())
    }

    /// Build, rank and annotate the graph.
    ///
    /// # Errors
    ///
    /// [`Error::Graph`] when the relationships are inconsistent.
    pub fn build_graph(&self) -> Result<AsGraph> {
        Ok(self.builder().build()?)
    }

    fn parse_comment(&mut self, comment: &str, line: usize) -> Result<()> {
        let target = if comment.starts_with(INPUT_CLIQUE_PREFIX) {
            &mut self.input_clique
        } else if comment.starts_with(IXP_PREFIX) {
            &mut self.ixps
        } else {
            return Ok(());
        };

        let Some((_, list)) = comment.split_once(':') else {
            return Err(dataset_error(line, "expected ':' before the ASN list"));
        };
        for token in list.split_whitespace() {
            target.insert(parse_asn(token, line)?);
        }
        Ok(())
    }

    fn parse_relationship(&mut self, line_text: &str, line: usize) -> Result<()> {
        let fields: Vec<&str> = line_text.split('|').map(str::trim).collect();
        if !(3..=4).contains(&fields.len()) {
            return Err(dataset_error(
                line,
                format!("expected 3 or 4 '|'-separated fields, found {}", fields.len()),
            ));
        }

        let first = parse_asn(fields[0], line)?;
        let second = parse_asn(fields[1], line)?;
        match fields[2] {
            "-1" => self
                .customer_provider
                .push(CustomerProviderLink::new(second, first)),
            "0" => self.peers.push(PeerLink::new(first, second)),
            other => {
                return Err(dataset_error(
                    line,
                    format!("unknown relationship type '{other}'"),
                ));
            }
        }
        Ok(())
    }
}

/// Read and parse a dataset.
///
/// # Errors
///
/// Errors reading the source, or see [`Dataset::parse`].
pub async fn load(source: &dyn DatasetSource) -> Result<Dataset> {
    tracing::info!(source = %source.describe(), "reading dataset");
    let text = source.read_text().await?;
    Dataset::parse(&text)
}

fn parse_asn(token: &str, line: usize) -> Result<Asn> {
    token
        .parse()
        .map_err(|e: asgraph_core::Error| dataset_error(line, e.to_string()))
}

fn dataset_error(line: usize, message: impl Into<String>) -> Error {
    Error::Dataset {
        line,
        message: message.into(),
    }
}
