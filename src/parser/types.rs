//! Shared types for resolved package sets.
//!
//! This module defines the [`Package`] and [`ResolvedSet`] structures that
//! every loader produces and that the tracer walks.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Errors that prevent a resolved package set from being built.
///
/// Any of these aborts the run before tracing begins.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// Failed to read a file from disk.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the JSON resolved-set file.
    #[error("Failed to parse resolved set: {0}")]
    Json(#[from] serde_json::Error),

    /// The same project name (after normalization) was registered twice.
    #[error("Package '{0}' is listed more than once")]
    DuplicatePackage(String),

    /// A root name does not match any package in the set.
    #[error("Root package '{0}' is not in the resolved set")]
    UnknownRoot(String),

    /// The site-packages directory does not exist or is not a directory.
    #[error("Not a package directory: {0}")]
    MissingDirectory(PathBuf),

    /// Failed while listing a package directory.
    #[error("Failed to scan package directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type alias for resolution operations.
pub type ResolutionResult<T> = Result<T, ResolutionError>;

/// Returned by [`ResolvedSet::lookup`] when no package has the given name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Package '{0}' not found")]
pub struct NotFound(pub String);

/// Normalizes a project name for case-insensitive comparison.
///
/// Lowercases the name and folds every run of `-`, `_` and `.` into a
/// single `-`, so `Zope.Interface` and `zope_interface` compare equal.
///
/// # Example
///
/// ```
/// use reqgraph::parser::types::canonical_name;
///
/// assert_eq!(canonical_name("Zope.Interface"), "zope-interface");
/// assert_eq!(canonical_name("typing__extensions"), "typing-extensions");
/// ```
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }

    out
}

/// A resolved package with its installed version and declared requirements.
///
/// # Example
///
/// ```
/// use reqgraph::parser::Package;
///
/// let pkg = Package::new("requests", Some("2.31.0"), ["idna>=2.5", "urllib3"]);
/// assert_eq!(pkg.label(), "requests-2.31.0");
/// assert_eq!(pkg.requirements().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    key: String,
    installed_version: Option<String>,
    requirements: Vec<String>,
}

impl Package {
    /// Creates a package from its name, optional version and raw requirement strings.
    pub fn new<I, S>(name: impl Into<String>, installed_version: Option<&str>, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        Self {
            key: canonical_name(&name),
            name,
            installed_version: installed_version.map(str::to_string),
            requirements: requirements.into_iter().map(Into::into).collect(),
        }
    }

    /// Project name as it was declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized name used as the package identity.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Installed version, `None` when unknown.
    pub fn installed_version(&self) -> Option<&str> {
        self.installed_version.as_deref()
    }

    /// Raw requirement strings in declaration order.
    pub fn requirements(&self) -> &[String] {
        &self.requirements
    }

    /// Display label: `name-version`, or the bare name when the version is unknown.
    pub fn label(&self) -> String {
        match &self.installed_version {
            Some(version) => format!("{}-{}", self.name, version),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A name-indexed collection of resolved packages.
///
/// Packages are kept in insertion order. Lookups are case-insensitive and
/// treat `-`, `_` and `.` as equivalent (see [`canonical_name`]).
///
/// # Example
///
/// ```
/// use reqgraph::parser::{Package, ResolvedSet};
///
/// let set = ResolvedSet::from_packages(vec![
///     Package::new("Flask", Some("3.0.0"), ["Werkzeug>=3.0"]),
///     Package::new("Werkzeug", Some("3.0.1"), Vec::<String>::new()),
/// ]).unwrap();
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.lookup("flask").unwrap().name(), "Flask");
/// assert!(set.lookup("django").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolvedSet {
    packages: Vec<Package>,
    index: HashMap<String, usize>,
    roots: Option<Vec<usize>>,
}

impl ResolvedSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from a list of packages.
    ///
    /// Fails with [`ResolutionError::DuplicatePackage`] if two packages share
    /// a normalized name.
    pub fn from_packages(packages: Vec<Package>) -> ResolutionResult<Self> {
        let mut set = Self {
            packages: Vec::with_capacity(packages.len()),
            index: HashMap::with_capacity(packages.len()),
            roots: None,
        };
        for package in packages {
            set.insert(package)?;
        }
        Ok(set)
    }

    /// Adds a package to the set.
    pub fn insert(&mut self, package: Package) -> ResolutionResult<()> {
        if self.index.contains_key(package.key()) {
            return Err(ResolutionError::DuplicatePackage(package.name().to_string()));
        }
        self.index.insert(package.key().to_string(), self.packages.len());
        self.packages.push(package);
        Ok(())
    }

    /// Restricts the roots of the set to the named packages.
    ///
    /// Without an explicit root list every package is a root.
    pub fn set_roots<I, S>(&mut self, names: I) -> ResolutionResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roots = Vec::new();
        for name in names {
            let name = name.as_ref();
            let idx = self
                .index
                .get(&canonical_name(name))
                .copied()
                .ok_or_else(|| ResolutionError::UnknownRoot(name.to_string()))?;
            roots.push(idx);
        }
        self.roots = Some(roots);
        Ok(())
    }

    /// Looks up a package by project name.
    pub fn lookup(&self, name: &str) -> Result<&Package, NotFound> {
        self.index
            .get(&canonical_name(name))
            .map(|&idx| &self.packages[idx])
            .ok_or_else(|| NotFound(name.to_string()))
    }

    /// Packages the trace should start from.
    pub fn roots(&self) -> Vec<&Package> {
        match &self.roots {
            Some(roots) => roots.iter().map(|&idx| &self.packages[idx]).collect(),
            None => self.packages.iter().collect(),
        }
    }

    /// Iterates over all packages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    /// Number of packages in the set.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if the set holds no packages.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
