//! Version conflict detection and edge reversal.
//!
//! A conflict exists when the traced graph contains the same project name
//! at more than one installed version.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::parser::{canonical_name, Package};
use crate::trace::{Edge, EdgeList};

/// Installed versions observed for one project name.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ObservedVersions {
    /// Spelling of the name as first seen
    name: String,
    versions: BTreeSet<String>,
}

/// Distinct installed versions seen per project name across all edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    observed: BTreeMap<String, ObservedVersions>,
}

/// A project name observed at more than one installed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConflict {
    /// The package name with conflicting versions
    pub name: String,
    /// All distinct versions, sorted
    pub versions: Vec<String>,
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in multiple versions: {}", self.name, self.versions.join(","))
    }
}

impl ConflictReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the installed version of `package`, if known.
    pub fn observe(&mut self, package: &Package) {
        let Some(version) = package.installed_version() else {
            debug!("{} has an unknown version", package.name());
            return;
        };

        self.observed
            .entry(package.key().to_string())
            .or_insert_with(|| ObservedVersions {
                name: package.name().to_string(),
                versions: BTreeSet::new(),
            })
            .versions
            .insert(version.to_string());
    }

    /// All versions seen for `name`, matched case-insensitively.
    pub fn versions(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.observed
            .get(&canonical_name(name))
            .map(|observed| &observed.versions)
    }

    /// Names seen at more than one version, sorted by normalized name.
    pub fn conflicts(&self) -> Vec<VersionConflict> {
        self.observed
            .values()
            .filter(|observed| observed.versions.len() > 1)
            .map(|observed| VersionConflict {
                name: observed.name.clone(),
                versions: observed.versions.iter().cloned().collect(),
            })
            .collect()
    }

    /// Returns true if any name was seen at more than one version.
    pub fn has_conflicts(&self) -> bool {
        self.observed.values().any(|o| o.versions.len() > 1)
    }

    /// Returns true if there are no conflicts.
    pub fn is_empty(&self) -> bool {
        !self.has_conflicts()
    }

    /// Number of conflicting names.
    pub fn len(&self) -> usize {
        self.observed
            .values()
            .filter(|o| o.versions.len() > 1)
            .count()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conflicts = self.conflicts();
        if conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        for conflict in conflicts {
            writeln!(f, "Warning: This project requires {conflict}")?;
        }
        Ok(())
    }
}

/// Collects the installed versions of every edge endpoint.
///
/// Packages with an unknown version are skipped.
///
/// # Example
///
/// ```rust
/// use reqgraph::analysis::analyze_conflicts;
/// use reqgraph::parser::Package;
/// use reqgraph::trace::Edge;
///
/// let none: [&str; 0] = [];
/// let a = Package::new("A", Some("1.0"), none);
/// let b = Package::new("B", Some("1.0"), none);
/// let c1 = Package::new("C", Some("1.0"), none);
/// let c2 = Package::new("C", Some("2.0"), none);
///
/// let report = analyze_conflicts(&[Edge::new(&a, &c1), Edge::new(&b, &c2)]);
/// let conflicts = report.conflicts();
/// assert_eq!(conflicts.len(), 1);
/// assert_eq!(conflicts[0].name, "C");
/// assert_eq!(conflicts[0].versions, vec!["1.0", "2.0"]);
/// ```
pub fn analyze_conflicts(edges: &[Edge<'_>]) -> ConflictReport {
    let mut report = ConflictReport::new();
    for edge in edges {
        report.observe(edge.dependent);
        report.observe(edge.dependency);
    }
    report
}

/// Returns a copy of `edges` with every pair swapped.
///
/// # Example
///
/// ```rust
/// use reqgraph::analysis::reverse;
/// use reqgraph::parser::Package;
/// use reqgraph::trace::Edge;
///
/// let none: [&str; 0] = [];
/// let a = Package::new("A", None, none);
/// let b = Package::new("B", None, none);
/// let edges = vec![Edge::new(&a, &b)];
///
/// assert_eq!(reverse(&edges), vec![Edge::new(&b, &a)]);
/// assert_eq!(reverse(&reverse(&edges)), edges);
/// ```
pub fn reverse<'a>(edges: &[Edge<'a>]) -> EdgeList<'a> {
    edges.iter().map(|edge| edge.reversed()).collect()
}
