//! Parser module for reqgraph.
//!
//! This module turns external package data into a [`ResolvedSet`] and
//! extracts project names from raw requirement strings.
//!
//! # Supported Sources
//!
//! - **Resolved-set JSON files** - explicit package lists with requirements
//! - **site-packages directories** - installed `.dist-info` / `.egg-info` metadata
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use reqgraph::parser::{site_packages, Pep508Parser, RequirementParser};
//!
//! let set = site_packages::load_dir(Path::new(".venv/lib/python3.12/site-packages")).unwrap();
//!
//! for package in set.iter() {
//!     for raw in package.requirements() {
//!         let name = Pep508Parser.project_name(raw).unwrap();
//!         println!("{} -> {}", package.name(), name);
//!     }
//! }
//! ```

pub mod requirement;
pub mod resolved_file;
pub mod site_packages;
pub mod types;

// Re-export commonly used types for convenience
pub use requirement::{InvalidRequirement, Pep508Parser, RequirementParser};
pub use types::{
    canonical_name, NotFound, Package, ResolutionError, ResolutionResult, ResolvedSet,
};
