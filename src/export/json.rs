//! JSON export implementation.
//!
//! Writes the packages seen and the dependency pairs between them. Keys are
//! emitted in sorted order with four-space indentation so repeated runs
//! produce identical, diff-friendly files.

use super::{ExportResult, Exporter};
use crate::graph::DependencyGraph;
use serde::Serialize;
use std::io::Write;

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable package for JSON output.
///
/// Fields are declared in alphabetical order so keys come out sorted.
#[derive(Serialize)]
struct JsonPackage {
    installed_version: Option<String>,
    name: String,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    dependencies: Vec<[String; 2]>,
    packages: Vec<JsonPackage>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> ExportResult<()> {
        let dependencies = graph
            .edge_labels()
            .into_iter()
            .map(|(from, to)| [from.to_string(), to.to_string()])
            .collect();

        let mut nodes = graph.get_all_nodes();
        nodes.sort_by(|a, b| a.label.cmp(&b.label));
        let packages = nodes
            .into_iter()
            .map(|node| JsonPackage {
                installed_version: node.version.clone(),
                name: node.name.clone(),
            })
            .collect();

        let export = JsonExport {
            dependencies,
            packages,
        };

        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        export
            .serialize(&mut serializer)
            .map_err(std::io::Error::from)?;

        writeln!(writer)?;
        Ok(())
    }
}
