//! Edge list analysis.
//!
//! This module inspects a traced [`EdgeList`](crate::trace::EdgeList):
//!
//! - Detect project names installed at more than one version
//! - Reverse edge direction (dependency → dependent) before export

pub mod conflicts;

pub use conflicts::{analyze_conflicts, reverse, ConflictReport, VersionConflict};
