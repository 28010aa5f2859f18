//! Export functionality for traced dependency graphs.
//!
//! This module provides exporters for writing a [`DependencyGraph`] in
//! various formats: JSON, a plain node dump, Graphviz DOT, and a PNG image
//! rendered through Graphviz.

pub mod dot;
pub mod dump;
pub mod image;
pub mod json;

use crate::graph::DependencyGraph;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - packages and dependency pairs
    Json,
    /// Plain list of dependency-side node labels
    Dump,
    /// Graphviz DOT graph description
    Dot,
    /// PNG image rendered by Graphviz
    Png,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Dump => write!(f, "dump"),
            ExportFormat::Dot => write!(f, "dot"),
            ExportFormat::Png => write!(f, "png"),
        }
    }
}

/// Errors that can occur while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The destination file could not be written.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to the output stream failed.
    #[error("Failed to write output: {0}")]
    Write(#[from] io::Error),

    /// The backend needed for this format is not available.
    #[error("{format} output is not supported: {reason}")]
    UnsupportedFormat { format: ExportFormat, reason: String },

    /// The external renderer ran but reported a failure.
    #[error("Graphviz failed: {0}")]
    Render(String),
}

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Trait for exporters.
pub trait Exporter {
    /// Export the graph to the given writer.
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> ExportResult<()>;
}

/// Export the graph in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    graph: &DependencyGraph,
    writer: &mut W,
) -> ExportResult<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(graph, writer),
        ExportFormat::Dump => dump::DumpExporter.export(graph, writer),
        ExportFormat::Dot => dot::DotExporter.export(graph, writer),
        ExportFormat::Png => image::ImageExporter::locate()?.export(graph, writer),
    }
}

/// Export the graph to a string.
pub fn export_to_string(format: ExportFormat, graph: &DependencyGraph) -> ExportResult<String> {
    let mut buffer = Vec::new();
    export(format, graph, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| ExportError::Write(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Export the graph to a file.
///
/// The output is produced in memory first, so a failed export never leaves
/// a partial file behind.
pub fn export_to_path(format: ExportFormat, graph: &DependencyGraph, path: &Path) -> ExportResult<()> {
    let mut buffer = Vec::new();
    export(format, graph, &mut buffer)?;
    fs::write(path, buffer).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A requested output: what to write and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub format: ExportFormat,
    pub path: PathBuf,
}

impl ExportTarget {
    pub fn new(format: ExportFormat, path: impl Into<PathBuf>) -> Self {
        Self {
            format,
            path: path.into(),
        }
    }
}

/// Writes every target, continuing past failures.
///
/// An empty graph is not rendered to an image. Returns the errors of the
/// targets that failed, in request order.
pub fn export_all(graph: &DependencyGraph, targets: &[ExportTarget]) -> Vec<ExportError> {
    let mut errors = Vec::new();

    for target in targets {
        if target.format == ExportFormat::Png && graph.edge_count() == 0 {
            info!("There is no dependency to draw.");
            continue;
        }

        info!("Writing {} to {}", target.format, target.path.display());
        match export_to_path(target.format, graph, &target.path) {
            Ok(()) => info!("Dependency graph written to {}", target.path.display()),
            Err(e) => errors.push(e),
        }
    }

    errors
}
