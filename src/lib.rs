//! reqgraph - dependency tracer and version conflict reporter for resolved package sets
//!
//! This crate walks the requirement declarations of already-resolved
//! packages, builds a cycle-safe dependency edge list, detects packages seen
//! at several versions, and exports the graph as JSON, a node dump, Graphviz
//! DOT, or a rendered PNG.

pub mod analysis;
pub mod export;
pub mod graph;
pub mod parser;
pub mod trace;
