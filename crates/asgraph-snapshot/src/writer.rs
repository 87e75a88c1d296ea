//! Snapshot writing.
//!
//! This module provides async, buffered writing of snapshot lines. The header
//! must be written before any entity record.

use crate::error::{Error, Result};
use crate::record::{records, EntityRecord, SnapshotHeader};
use asgraph_core::AsGraph;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Async writer for snapshot files.
///
/// Each value is serialized to a single JSON line.
///
/// # Examples
///
/// ```no_run
/// use asgraph_snapshot::SnapshotWriter;
/// use tokio::fs::File;
///
/// # async fn example(graph: &asgraph_core::AsGraph) -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::create("graph.snapshot.jsonl").await?;
/// let mut writer = SnapshotWriter::new(file);
/// writer.write_graph(graph, None).await?;
/// writer.flush().await?;
/// # Ok(())
/// # }
/// ```
pub struct SnapshotWriter<W> {
    writer: BufWriter<W>,
    header_written: bool,
    records_written: usize,
}

impl<W: AsyncWrite + Unpin> SnapshotWriter<W> {
    /// Creates a new `SnapshotWriter` wrapping the given async writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            header_written: false,
            records_written: 0,
        }
    }

    /// Number of entity records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Write the header line.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFormat`] if a header was already written; I/O and
    /// serialization errors otherwise.
    pub async fn write_header(&mut self, header: &SnapshotHeader) -> Result<()> {
        if self.header_written {
            return Err(Error::InvalidFormat(
                "header already written".to_string(),
            ));
        }
        self.write_line(header).await?;
        self.header_written = true;
        Ok(())
    }

    /// Write one entity record.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFormat`] if no header has been written yet; I/O and
    /// serialization errors otherwise.
    pub async fn write_record(&mut self, record: &EntityRecord) -> Result<()> {
        if !self.header_written {
            return Err(Error::InvalidFormat(
                "entity record written before header".to_string(),
            ));
        }
        self.write_line(record).await?;
        self.records_written += 1;
        Ok(())
    }

    /// Write a header for `graph` followed by every entity record.
    ///
    /// Returns the header that was written.
    ///
    /// # Errors
    ///
    /// See [`write_header`](Self::write_header) and
    /// [`write_record`](Self::write_record).
    pub async fn write_graph<D>(
        &mut self,
        graph: &AsGraph<D>,
        source_digest: Option<String>,
    ) -> Result<SnapshotHeader> {
        let header = SnapshotHeader::for_graph(graph, source_digest);
        self.write_header(&header).await?;
        for record in records(graph) {
            self.write_record(&record).await?;
        }
        tracing::debug!(records = self.records_written, "wrote snapshot records");
        Ok(header)
    }

    /// Flush buffered lines to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the flush fails.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying buffered writer.
    ///
    /// Note: This does not flush the buffer.
    #[must_use]
    pub fn into_inner(self) -> BufWriter<W> {
        self.writer
    }

    async fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asgraph_core::{Asn, CustomerProviderLink, GraphBuilder};
    use std::io::Cursor;

    fn small_graph() -> AsGraph {
        let asn = |raw| Asn::new(raw).unwrap();
        GraphBuilder::new()
            .customer_provider_links([CustomerProviderLink::new(asn(2), asn(1))])
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn record_before_header_is_rejected() {
        let graph = small_graph();
        let record = records(&graph).next().unwrap();
        let mut writer = SnapshotWriter::new(Cursor::new(Vec::new()));

        let err = writer.write_record(&record).await.unwrap_err();

        assert!(matches!(err, Error::InvalidFormat(_)));
        assert_eq!(writer.records_written(), 0);
    }

    #[tokio::test]
    async fn write_graph_emits_one_line_per_entity_plus_header() {
        let graph = small_graph();
        let mut writer = SnapshotWriter::new(Cursor::new(Vec::new()));

        let header = writer.write_graph(&graph, Some("abc".to_string())).await.unwrap();
        writer.flush().await.unwrap();

        let bytes = writer.into_inner().into_inner().into_inner();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(header.entity_count, 2);
        assert_eq!(header.rank_count, 2);
        assert!(text.lines().next().unwrap().contains("\"source_digest\":\"abc\""));
    }

    #[tokio::test]
    async fn second_header_is_rejected() {
        let graph = small_graph();
        let header = SnapshotHeader::for_graph(&graph, None);
        let mut writer = SnapshotWriter::new(Cursor::new(Vec::new()));

        writer.write_header(&header).await.unwrap();

        assert!(writer.write_header(&header).await.is_err());
    }
}
