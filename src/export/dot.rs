//! Graphviz DOT export implementation.
//!
//! Every node is written by its quoted label, followed by one statement per
//! edge, so the output can be fed straight to `dot`, `neato` and friends.

use super::{ExportResult, Exporter};
use crate::graph::DependencyGraph;
use std::io::Write;

/// DOT exporter implementation.
pub struct DotExporter;

impl DotExporter {
    /// Quote a label as a DOT identifier.
    fn quote(label: &str) -> String {
        format!("\"{}\"", label.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

impl Exporter for DotExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> ExportResult<()> {
        writeln!(writer, "digraph dependencies {{")?;

        for node in graph.get_all_nodes() {
            writeln!(writer, "    {};", Self::quote(&node.label))?;
        }

        for (from, to) in graph.edge_labels() {
            writeln!(writer, "    {} -> {};", Self::quote(from), Self::quote(to))?;
        }

        writeln!(writer, "}}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Package;
    use crate::trace::Edge;

    fn export_dot(graph: &DependencyGraph) -> String {
        let mut output = Vec::new();
        DotExporter.export(graph, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_dot_export() {
        let none: [&str; 0] = [];
        let a = Package::new("a", Some("1.0"), none);
        let b = Package::new("b", None, none);
        let graph = DependencyGraph::from_edges(&[Edge::new(&a, &b), Edge::new(&b, &a)]);

        let expected = "digraph dependencies {\n    \"a-1.0\";\n    \"b\";\n    \"a-1.0\" -> \"b\";\n    \"b\" -> \"a-1.0\";\n}\n";
        assert_eq!(export_dot(&graph), expected);
    }

    #[test]
    fn test_dot_empty_graph() {
        assert_eq!(export_dot(&DependencyGraph::new()), "digraph dependencies {\n}\n");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(DotExporter::quote(r#"odd"name\"#), r#""odd\"name\\""#);
    }
}
