//! Dependency graph implementation using petgraph.
//!
//! Provides a directed graph of package labels built from a traced edge
//! list, with cycle detection and the node/edge views used by exporters.

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

use crate::parser::Package;
use crate::trace::Edge;

/// Represents a node in the dependency graph.
///
/// Each node is one distinct `name-version` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    /// Display label, `name-version` or the bare name
    pub label: String,
    /// Package name as declared
    pub name: String,
    /// Installed version, if known
    pub version: Option<String>,
}

impl DependencyNode {
    /// Creates a node describing `package`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reqgraph::graph::DependencyNode;
    /// use reqgraph::parser::Package;
    ///
    /// let pkg = Package::new("six", Some("1.16.0"), Vec::<String>::new());
    /// let node = DependencyNode::from_package(&pkg);
    /// assert_eq!(node.label, "six-1.16.0");
    /// ```
    pub fn from_package(package: &Package) -> Self {
        Self {
            label: package.label(),
            name: package.name().to_string(),
            version: package.installed_version().map(str::to_string),
        }
    }
}

/// Represents an edge in the dependency graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DependencyEdge;

/// A directed graph representing package dependencies.
///
/// The graph uses petgraph's `DiGraph` internally, with nodes representing
/// packages and edges representing dependency relationships. Edges point
/// from the dependent package to its dependency. Nodes and edges are kept
/// unique and in insertion order.
///
/// # Example
///
/// ```rust
/// use reqgraph::graph::DependencyGraph;
/// use reqgraph::parser::Package;
/// use reqgraph::trace::Edge;
///
/// let none: [&str; 0] = [];
/// let app = Package::new("app", Some("1.0"), none);
/// let flask = Package::new("flask", Some("3.0.0"), none);
/// let jinja = Package::new("jinja2", Some("3.1.2"), none);
///
/// let graph = DependencyGraph::from_edges(&[
///     Edge::new(&app, &flask),
///     Edge::new(&flask, &jinja),
///     Edge::new(&app, &flask),
/// ]);
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<DependencyNode, DependencyEdge>,
    /// Maps labels to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Builds a graph from an edge list.
    ///
    /// Endpoints that render to the same label share one node, and repeated
    /// label pairs collapse into one edge.
    pub fn from_edges(edges: &[Edge<'_>]) -> Self {
        let mut graph = Self::with_capacity(edges.len() + 1, edges.len());

        for edge in edges {
            let from = graph.add_package(edge.dependent);
            let to = graph.add_package(edge.dependency);
            graph.graph.update_edge(from, to, DependencyEdge);
        }

        graph
    }

    /// Adds a package to the graph.
    ///
    /// If a node with the same label already exists, returns its existing
    /// node index without modification.
    pub fn add_package(&mut self, package: &Package) -> NodeIndex {
        let node = DependencyNode::from_package(package);
        if let Some(&idx) = self.node_indices.get(&node.label) {
            return idx;
        }

        let label = node.label.clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(label, idx);
        idx
    }

    /// Gets the dependencies of a node (outgoing edges).
    pub fn get_dependencies(&self, label: &str) -> Vec<&DependencyNode> {
        let Some(&idx) = self.node_indices.get(label) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .filter_map(|edge| self.graph.node_weight(edge.target()))
            .collect()
    }

    /// Gets the dependents of a node (incoming edges).
    pub fn get_dependents(&self, label: &str) -> Vec<&DependencyNode> {
        let Some(&idx) = self.node_indices.get(label) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|edge| self.graph.node_weight(edge.source()))
            .collect()
    }

    /// Gets all nodes in insertion order.
    pub fn get_all_nodes(&self) -> Vec<&DependencyNode> {
        self.graph.node_weights().collect()
    }

    /// Gets every edge as a `(dependent, dependency)` label pair, in insertion order.
    pub fn edge_labels(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].label.as_str(),
                    self.graph[edge.target()].label.as_str(),
                )
            })
            .collect()
    }

    /// Labels of nodes that are the target of at least one edge, sorted.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reqgraph::graph::DependencyGraph;
    /// use reqgraph::parser::Package;
    /// use reqgraph::trace::Edge;
    ///
    /// let none: [&str; 0] = [];
    /// let a = Package::new("a", Some("1"), none);
    /// let b = Package::new("b", Some("1"), none);
    /// let c = Package::new("c", None, none);
    ///
    /// let graph = DependencyGraph::from_edges(&[Edge::new(&a, &c), Edge::new(&b, &c), Edge::new(&a, &b)]);
    /// let labels: Vec<_> = graph.dependency_labels().into_iter().collect();
    /// assert_eq!(labels, vec!["b-1", "c"]);
    /// ```
    pub fn dependency_labels(&self) -> BTreeSet<&str> {
        self.graph
            .edge_references()
            .map(|edge| self.graph[edge.target()].label.as_str())
            .collect()
    }

    /// Checks if the graph contains cycles.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Detects and returns all cycles in the graph.
    ///
    /// Uses Tarjan's algorithm to find strongly connected components
    /// that form cycles.
    ///
    /// # Returns
    ///
    /// A vector of cycles, where each cycle is a vector of node labels.
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let sccs = tarjan_scc(&self.graph);
        let mut cycles = Vec::new();

        for scc in sccs {
            // A strongly connected component is a cycle if it has more than one node,
            // or if it's a single node with a self-loop
            if scc.len() > 1 {
                let cycle: Vec<String> = scc
                    .iter()
                    .filter_map(|&idx| self.graph.node_weight(idx))
                    .map(|node| node.label.clone())
                    .collect();
                cycles.push(cycle);
            } else if scc.len() == 1 {
                let idx = scc[0];
                if self.graph.contains_edge(idx, idx) {
                    if let Some(node) = self.graph.node_weight(idx) {
                        cycles.push(vec![node.label.clone()]);
                    }
                }
            }
        }

        cycles
    }

    /// Returns detailed cycle information including the cycle path.
    pub fn get_cycle_details(&self) -> Vec<CycleInfo> {
        self.detect_cycles()
            .into_iter()
            .map(|nodes| CycleInfo { nodes })
            .collect()
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if a node exists in the graph.
    pub fn contains(&self, label: &str) -> bool {
        self.node_indices.contains_key(label)
    }
}

/// Information about a detected circular dependency cycle.
///
/// Contains the list of node labels that form the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfo {
    /// The labels in the cycle (the last connects back to the first)
    pub nodes: Vec<String>,
}

impl CycleInfo {
    /// Returns a formatted string representation of the cycle path.
    ///
    /// For example: "a -> b -> c -> a"
    pub fn cycle_path(&self) -> String {
        let Some(first) = self.nodes.first() else {
            return String::new();
        };
        format!("{} -> {}", self.nodes.join(" -> "), first)
    }

    /// Returns the number of packages in the cycle.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str, version: Option<&str>) -> Package {
        Package::new(name, version, Vec::<String>::new())
    }

    #[test]
    fn test_create_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_from_edges_deduplicates() {
        let a = pkg("a", Some("1.0"));
        let b = pkg("b", Some("2.0"));
        let b_copy = pkg("b", Some("2.0"));

        let graph = DependencyGraph::from_edges(&[Edge::new(&a, &b), Edge::new(&a, &b_copy)]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains("a-1.0"));
        assert!(graph.contains("b-2.0"));
    }

    #[test]
    fn test_add_package() {
        let mut graph = DependencyGraph::new();
        let idx = graph.add_package(&pkg("react", Some("18.2.0")));
        let idx2 = graph.add_package(&pkg("react", Some("18.2.0")));

        assert_eq!(idx, idx2);
        assert_eq!(graph.node_count(), 1);
        assert!(graph.contains("react-18.2.0"));

        let nodes = graph.get_all_nodes();
        assert_eq!(nodes[0].name, "react");
        assert_eq!(nodes[0].version.as_deref(), Some("18.2.0"));
    }

    #[test]
    fn test_dependencies_and_dependents() {
        let app = pkg("app", Some("1"));
        let web = pkg("web", Some("2"));
        let db = pkg("db", Some("3"));

        let graph = DependencyGraph::from_edges(&[Edge::new(&app, &web), Edge::new(&app, &db), Edge::new(&web, &db)]);

        let deps: Vec<&str> = graph.get_dependencies("app-1").iter().map(|n| n.label.as_str()).collect();
        assert_eq!(deps.len(), 2);
        assert!(deps.contains(&"web-2"));
        assert!(deps.contains(&"db-3"));

        let dependents: Vec<&str> = graph.get_dependents("db-3").iter().map(|n| n.label.as_str()).collect();
        assert_eq!(dependents.len(), 2);
        assert!(dependents.contains(&"app-1"));

        assert!(graph.get_dependencies("nonexistent").is_empty());
        assert!(graph.get_dependents("nonexistent").is_empty());
    }

    #[test]
    fn test_edge_labels_in_insertion_order() {
        let a = pkg("a", None);
        let b = pkg("b", None);
        let c = pkg("c", None);

        let graph = DependencyGraph::from_edges(&[Edge::new(&b, &c), Edge::new(&a, &b)]);

        assert_eq!(graph.edge_labels(), vec![("b", "c"), ("a", "b")]);
        let nodes: Vec<&str> = graph.get_all_nodes().iter().map(|n| n.label.as_str()).collect();
        assert_eq!(nodes, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_dependency_labels_excludes_pure_sources() {
        let a = pkg("a", None);
        let b = pkg("b", None);

        let graph = DependencyGraph::from_edges(&[Edge::new(&a, &b)]);

        assert_eq!(graph.dependency_labels().into_iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_detect_cycles() {
        let a = pkg("a", None);
        let b = pkg("b", None);
        let c = pkg("c", None);
        let d = pkg("d", None);

        let graph = DependencyGraph::from_edges(&[
            Edge::new(&a, &b),
            Edge::new(&b, &c),
            Edge::new(&c, &a),
            Edge::new(&a, &d),
        ]);

        assert!(graph.has_cycles());
        let cycles = graph.detect_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 3);
        assert!(cycles[0].contains(&"a".to_string()));
        assert!(!cycles[0].contains(&"d".to_string()));
    }

    #[test]
    fn test_no_cycles() {
        let a = pkg("a", None);
        let b = pkg("b", None);
        let c = pkg("c", None);

        let graph = DependencyGraph::from_edges(&[Edge::new(&a, &b), Edge::new(&b, &c)]);

        assert!(!graph.has_cycles());
        assert!(graph.detect_cycles().is_empty());
    }

    #[test]
    fn test_cycle_path() {
        let cycle = CycleInfo {
            nodes: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        assert_eq!(cycle.cycle_path(), "a -> b -> c -> a");
        assert_eq!(cycle.len(), 3);

        let empty = CycleInfo { nodes: vec![] };
        assert_eq!(empty.cycle_path(), "");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_cycle_details_from_two_node_loop() {
        let a = pkg("a", Some("1"));
        let b = pkg("b", Some("1"));

        let graph = DependencyGraph::from_edges(&[Edge::new(&a, &b), Edge::new(&b, &a)]);

        let details = graph.get_cycle_details();
        assert_eq!(details.len(), 1);
        assert!(details[0].nodes.contains(&"a-1".to_string()));
        assert!(details[0].nodes.contains(&"b-1".to_string()));
    }
}
