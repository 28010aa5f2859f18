//! Loader for JSON resolved-set files.
//!
//! A resolved-set file lists already-resolved packages together with the
//! raw requirement strings each one declares:
//!
//! ```json
//! {
//!   "roots": ["app"],
//!   "packages": [
//!     {"name": "app", "version": "1.0", "requires": ["requests>=2.0"]},
//!     {"name": "requests", "version": "2.31.0"}
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::types::{Package, ResolutionError, ResolutionResult, ResolvedSet};

/// On-disk representation of a resolved set.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResolvedFile {
    /// Names of the packages to start tracing from. All packages when absent.
    #[serde(default)]
    pub roots: Option<Vec<String>>,

    /// Every package available for lookup.
    #[serde(default)]
    pub packages: Vec<ResolvedEntry>,
}

/// A single package entry of a resolved-set file.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedEntry {
    pub name: String,

    /// Installed version, `null` or missing when unknown.
    #[serde(default)]
    pub version: Option<String>,

    /// Raw requirement strings in declaration order.
    #[serde(default)]
    pub requires: Vec<String>,
}

impl ResolvedFile {
    /// Converts the file contents into a [`ResolvedSet`].
    pub fn into_resolved_set(self) -> ResolutionResult<ResolvedSet> {
        let packages = self
            .packages
            .into_iter()
            .map(|entry| Package::new(entry.name, entry.version.as_deref(), entry.requires))
            .collect();

        let mut set = ResolvedSet::from_packages(packages)?;
        if let Some(roots) = self.roots {
            set.set_roots(roots)?;
        }
        Ok(set)
    }
}

/// Loads a resolved set from a JSON file.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use reqgraph::parser::resolved_file::load_file;
///
/// let set = load_file(Path::new("resolved.json")).unwrap();
/// println!("{} packages", set.len());
/// ```
pub fn load_file(path: &Path) -> ResolutionResult<ResolvedSet> {
    let content = fs::read_to_string(path).map_err(|source| ResolutionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&content)
}

/// Loads a resolved set from a JSON string.
///
/// # Example
///
/// ```
/// use reqgraph::parser::resolved_file::load_str;
///
/// let json = r#"{"packages": [{"name": "six", "version": "1.16.0"}]}"#;
/// let set = load_str(json).unwrap();
/// assert_eq!(set.lookup("six").unwrap().installed_version(), Some("1.16.0"));
/// ```
pub fn load_str(content: &str) -> ResolutionResult<ResolvedSet> {
    let file: ResolvedFile = serde_json::from_str(content)?;
    file.into_resolved_set()
}
