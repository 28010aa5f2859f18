//! PNG rendering through Graphviz.
//!
//! The graph is converted to DOT and piped into the `dot` executable, whose
//! PNG output is copied to the writer. Rendering is only available when
//! Graphviz is installed.

use super::dot::DotExporter;
use super::{ExportError, ExportFormat, ExportResult, Exporter};
use crate::graph::DependencyGraph;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Default file name for the rendered image.
pub const DEFAULT_IMAGE_PATH: &str = "dependency.png";

/// Image exporter backed by a Graphviz executable.
#[derive(Debug, Clone)]
pub struct ImageExporter {
    program: PathBuf,
}

impl ImageExporter {
    /// Finds `dot` on `PATH`.
    pub fn locate() -> ExportResult<Self> {
        Self::locate_program("dot")
    }

    /// Finds the named Graphviz layout program on `PATH`.
    pub fn locate_program(name: &str) -> ExportResult<Self> {
        let program = which::which(name).map_err(|e| ExportError::UnsupportedFormat {
            format: ExportFormat::Png,
            reason: format!("Graphviz '{}' not found ({})", name, e),
        })?;
        debug!("Using Graphviz at {}", program.display());
        Ok(Self { program })
    }
}

impl Exporter for ImageExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> ExportResult<()> {
        let mut dot = Vec::new();
        DotExporter.export(graph, &mut dot)?;

        let mut child = Command::new(&self.program)
            .arg("-Tpng")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Dropping stdin closes the pipe so `dot` sees end of input.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&dot)?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(ExportError::Render(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        writer.write_all(&output.stdout)?;
        Ok(())
    }
}
