//! Dependency tracing.
//!
//! This module provides the [`Tracer`], which turns a [`ResolvedSet`] into
//! an [`EdgeList`] of dependent → dependency pairs.
//!
//! # Example
//!
//! ```rust
//! use reqgraph::parser::{Package, ResolvedSet};
//! use reqgraph::trace;
//!
//! let set = ResolvedSet::from_packages(vec![
//!     Package::new("app", Some("1.0"), ["requests>=2", "missing"]),
//!     Package::new("requests", Some("2.31.0"), Vec::<String>::new()),
//! ]).unwrap();
//!
//! let result = trace::trace(&set.roots(), &set);
//! assert_eq!(result.edges.len(), 1);
//! assert_eq!(result.issues.len(), 1);
//! ```
//!
//! [`ResolvedSet`]: crate::parser::ResolvedSet

mod tracer;

pub use tracer::{trace, Edge, EdgeList, Trace, TraceIssue, Tracer};
