//! Depth-first dependency tracing over a resolved package set.
//!
//! Walks each root package's requirement strings, resolves them against the
//! [`ResolvedSet`], and records one dependent → dependency edge per
//! satisfied requirement. Traversal uses an explicit work stack, so deep
//! graphs cannot overflow the call stack, and a single visited set shared
//! across the whole walk, so cycles terminate.

use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use crate::parser::{Package, Pep508Parser, RequirementParser, ResolvedSet};

/// A directed relationship from a package to one of its dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a> {
    /// The package declaring the requirement
    pub dependent: &'a Package,
    /// The package satisfying the requirement
    pub dependency: &'a Package,
}

impl<'a> Edge<'a> {
    /// Creates a new edge.
    pub fn new(dependent: &'a Package, dependency: &'a Package) -> Self {
        Self {
            dependent,
            dependency,
        }
    }

    /// Returns the same edge pointing the other way.
    pub fn reversed(self) -> Self {
        Self {
            dependent: self.dependency,
            dependency: self.dependent,
        }
    }

    /// Returns the `(dependent, dependency)` display labels.
    pub fn labels(&self) -> (String, String) {
        (self.dependent.label(), self.dependency.label())
    }
}

/// Edges in discovery order.
pub type EdgeList<'a> = Vec<Edge<'a>>;

/// A non-fatal problem found while tracing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceIssue {
    /// A requirement string could not be parsed into a project name.
    #[error("Invalid requirement {requirement:?} in {package}: {reason}")]
    InvalidRequirement {
        package: String,
        requirement: String,
        reason: String,
    },

    /// A requirement names a project missing from the resolved set.
    #[error("Dependency {name} of {package} not found")]
    DependencyNotFound { package: String, name: String },
}

/// The result of a trace: every edge found plus the issues encountered.
#[derive(Debug, Clone, Default)]
pub struct Trace<'a> {
    pub edges: EdgeList<'a>,
    pub issues: Vec<TraceIssue>,
}

impl Trace<'_> {
    /// Issues caused by unparsable requirement strings.
    pub fn invalid_requirements(&self) -> impl Iterator<Item = &TraceIssue> {
        self.issues
            .iter()
            .filter(|i| matches!(i, TraceIssue::InvalidRequirement { .. }))
    }

    /// Issues caused by requirements with no matching package.
    pub fn missing_dependencies(&self) -> impl Iterator<Item = &TraceIssue> {
        self.issues
            .iter()
            .filter(|i| matches!(i, TraceIssue::DependencyNotFound { .. }))
    }

    /// Returns true if no issues were recorded.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A package whose requirements are being expanded.
struct Frame<'a> {
    package: &'a Package,
    next: usize,
}

/// Traces dependency edges through a [`ResolvedSet`].
///
/// # Example
///
/// ```rust
/// use reqgraph::parser::{Package, ResolvedSet};
/// use reqgraph::trace::Tracer;
///
/// let set = ResolvedSet::from_packages(vec![
///     Package::new("a", Some("1.0"), ["b>=2"]),
///     Package::new("b", Some("2.0"), ["a"]),
/// ]).unwrap();
///
/// let trace = Tracer::new(&set).trace(&set.roots());
/// let labels: Vec<_> = trace.edges.iter().map(|e| e.labels()).collect();
/// assert_eq!(labels, vec![
///     ("a-1.0".to_string(), "b-2.0".to_string()),
///     ("b-2.0".to_string(), "a-1.0".to_string()),
/// ]);
/// ```
pub struct Tracer<'a, P = Pep508Parser> {
    resolved: &'a ResolvedSet,
    parser: P,
}

impl<'a> Tracer<'a> {
    /// Creates a tracer using the PEP 508 requirement parser.
    pub fn new(resolved: &'a ResolvedSet) -> Self {
        Self {
            resolved,
            parser: Pep508Parser,
        }
    }
}

impl<'a, P: RequirementParser> Tracer<'a, P> {
    /// Replaces the requirement parser.
    pub fn with_parser<Q: RequirementParser>(self, parser: Q) -> Tracer<'a, Q> {
        Tracer {
            resolved: self.resolved,
            parser,
        }
    }

    /// Traces all edges reachable from `roots`.
    ///
    /// Each package's requirements are expanded at most once, even when it
    /// is reachable along several paths or sits on a cycle. Edges appear in
    /// the order a recursive depth-first walk would discover them.
    pub fn trace(&self, roots: &[&'a Package]) -> Trace<'a> {
        let mut trace = Trace::default();
        let mut visited: HashSet<&'a str> = HashSet::new();
        let mut recorded: HashSet<(&'a str, &'a str)> = HashSet::new();
        let mut stack: Vec<Frame<'a>> = Vec::new();

        for &root in roots {
            if !visited.insert(root.key()) {
                continue;
            }
            stack.push(Frame {
                package: root,
                next: 0,
            });

            while let Some(frame) = stack.last_mut() {
                let package = frame.package;
                let Some(raw) = package.requirements().get(frame.next) else {
                    stack.pop();
                    continue;
                };
                frame.next += 1;

                let Some(dependency) = self.resolve(package, raw, &mut trace.issues) else {
                    continue;
                };

                if dependency.key() == package.key() {
                    debug!("Ignoring self-requirement {:?} of {}", raw, package);
                    continue;
                }

                if recorded.insert((package.key(), dependency.key())) {
                    trace.edges.push(Edge::new(package, dependency));
                }

                if visited.insert(dependency.key()) {
                    stack.push(Frame {
                        package: dependency,
                        next: 0,
                    });
                }
            }
        }

        info!(
            "Traced {} dependencies across {} packages ({} issues)",
            trace.edges.len(),
            visited.len(),
            trace.issues.len()
        );
        trace
    }

    /// Maps one requirement string to its package, recording any issue.
    fn resolve(
        &self,
        package: &'a Package,
        raw: &str,
        issues: &mut Vec<TraceIssue>,
    ) -> Option<&'a Package> {
        let name = match self.parser.project_name(raw) {
            Ok(name) => name,
            Err(e) => {
                error!("Invalid requirement: {:?} ({}) in requirement {}", raw, e.reason, package);
                issues.push(TraceIssue::InvalidRequirement {
                    package: package.label(),
                    requirement: raw.to_string(),
                    reason: e.reason,
                });
                return None;
            }
        };

        match self.resolved.lookup(&name) {
            Ok(dependency) => Some(dependency),
            Err(_) => {
                warn!("Dependency {} of {} not found", name, package);
                issues.push(TraceIssue::DependencyNotFound {
                    package: package.label(),
                    name,
                });
                None
            }
        }
    }
}

/// Traces `roots` through `resolved` with the default requirement parser.
pub fn trace<'a>(roots: &[&'a Package], resolved: &'a ResolvedSet) -> Trace<'a> {
    Tracer::new(resolved).trace(roots)
}
