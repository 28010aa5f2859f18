//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`DependencyGraph`] struct, which collapses a
//! traced edge list into a directed graph of `name-version` labels for
//! exporting and cycle analysis.
//!
//! # Example
//!
//! ```rust
//! use reqgraph::graph::DependencyGraph;
//! use reqgraph::parser::Package;
//! use reqgraph::trace::Edge;
//!
//! let none: [&str; 0] = [];
//! let a = Package::new("a", Some("1.0"), none);
//! let b = Package::new("b", Some("1.0"), none);
//!
//! let graph = DependencyGraph::from_edges(&[Edge::new(&a, &b), Edge::new(&b, &a)]);
//!
//! assert_eq!(graph.node_count(), 2);
//! assert!(graph.has_cycles());
//! ```

mod dependency_graph;

pub use dependency_graph::{CycleInfo, DependencyEdge, DependencyGraph, DependencyNode};
