//! Plain node dump.
//!
//! Writes every distinct dependency-side label (a node that is the target
//! of at least one edge), one per line in sorted order.

use super::{ExportResult, Exporter};
use crate::graph::DependencyGraph;
use std::io::Write;

/// Dependency label dump exporter.
pub struct DumpExporter;

impl Exporter for DumpExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> ExportResult<()> {
        let labels: Vec<&str> = graph.dependency_labels().into_iter().collect();
        write!(writer, "{}", labels.join("\n"))?;
        Ok(())
    }
}
