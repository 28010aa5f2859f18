//! Loader for installed Python environments.
//!
//! Scans a `site-packages` directory for `*.dist-info` and `*.egg-info`
//! metadata and builds a [`ResolvedSet`] from the installed distributions.
//!
//! # Supported Layouts
//!
//! - **`*.dist-info/METADATA`** - `Name`, `Version` and `Requires-Dist` headers
//! - **`*.egg-info/PKG-INFO`** - `Name` and `Version`, with requirements read
//!   from the unconditional section of `requires.txt`
//!
//! Requirements that only apply to an optional extra are dropped, since an
//! installed distribution does not pull them in.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::types::{Package, ResolutionError, ResolutionResult, ResolvedSet};

/// Headers of interest from a core metadata file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub requires_dist: Vec<String>,
}

/// Parses the header block of a `METADATA` or `PKG-INFO` file.
///
/// Parsing stops at the first blank line, where the long description begins.
/// Continuation lines are ignored.
///
/// # Example
///
/// ```
/// use reqgraph::parser::site_packages::parse_metadata;
///
/// let meta = parse_metadata("Name: rich\nVersion: 13.7.0\nRequires-Dist: pygments<3\n");
/// assert_eq!(meta.name.as_deref(), Some("rich"));
/// assert_eq!(meta.requires_dist, vec!["pygments<3"]);
/// ```
pub fn parse_metadata(content: &str) -> Metadata {
    let mut meta = Metadata::default();

    for line in content.lines() {
        if line.trim().is_empty() {
            break;
        }
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim().to_ascii_lowercase().as_str() {
            "name" => meta.name = Some(value.to_string()),
            "version" => meta.version = Some(value.to_string()),
            "requires-dist" => {
                if !is_extra_only(value) {
                    meta.requires_dist.push(value.to_string());
                }
            }
            _ => {}
        }
    }

    meta
}

/// Returns true if the requirement's environment marker compares the
/// `extra` variable, on either side of `==`.
fn is_extra_only(requirement: &str) -> bool {
    static EXTRA_MARKER: OnceLock<Regex> = OnceLock::new();
    let extra = EXTRA_MARKER
        .get_or_init(|| Regex::new(r"\bextra\s*==|==\s*extra\b").expect("extra marker pattern is valid"));

    requirement
        .split_once(';')
        .is_some_and(|(_, marker)| extra.is_match(marker))
}

/// Reads the unconditional requirements from an egg-info `requires.txt`.
///
/// Everything from the first `[section]` header on belongs to an extra or
/// an environment marker and is skipped.
pub fn parse_requires_txt(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with('['))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn read(path: &Path) -> ResolutionResult<String> {
    fs::read_to_string(path).map_err(|source| ResolutionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the metadata of a single `.dist-info` or `.egg-info` directory.
fn load_distribution(dir: &Path) -> ResolutionResult<Option<Metadata>> {
    let extension = dir.extension().and_then(|e| e.to_str());

    let metadata = match extension {
        Some("dist-info") => parse_metadata(&read(&dir.join("METADATA"))?),
        Some("egg-info") => {
            let mut meta = parse_metadata(&read(&dir.join("PKG-INFO"))?);
            let requires = dir.join("requires.txt");
            if requires.is_file() {
                meta.requires_dist = parse_requires_txt(&read(&requires)?);
            }
            meta
        }
        _ => return Ok(None),
    };

    Ok(Some(metadata))
}

/// Builds a resolved set from the distributions installed in `dir`.
///
/// Distributions are visited in file name order. A metadata file without a
/// `Name` header, or a second distribution of an already seen project, is
/// skipped with a warning.
pub fn load_dir(dir: &Path) -> ResolutionResult<ResolvedSet> {
    if !dir.is_dir() {
        return Err(ResolutionError::MissingDirectory(dir.to_path_buf()));
    }

    let mut set = ResolvedSet::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let path: PathBuf = entry.into_path();

        let Some(meta) = load_distribution(&path)? else {
            continue;
        };
        let Some(name) = meta.name else {
            warn!("Skipping {}: metadata has no Name header", path.display());
            continue;
        };

        debug!(
            "Found {} {} with {} requirements",
            name,
            meta.version.as_deref().unwrap_or("(unknown version)"),
            meta.requires_dist.len()
        );

        let package = Package::new(name, meta.version.as_deref(), meta.requires_dist);
        match set.insert(package) {
            Ok(()) => {}
            Err(ResolutionError::DuplicatePackage(name)) => {
                warn!("Skipping {}: {} is already installed", path.display(), name);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_dist_info(root: &Path, dir: &str, metadata: &str) {
        let path = root.join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("METADATA"), metadata).unwrap();
    }

    #[test]
    fn test_parse_metadata_headers() {
        let content = "Metadata-Version: 2.1\n\
                       Name: requests\n\
                       Version: 2.31.0\n\
                       Requires-Dist: charset-normalizer (<4,>=2)\n\
                       Requires-Dist: idna (<4,>=2.5)\n\
                       Requires-Dist: PySocks (!=1.5.7,>=1.5.6) ; extra == 'socks'\n\
                       \n\
                       Requires-Dist: not-a-header\n";

        let meta = parse_metadata(content);
        assert_eq!(meta.name.as_deref(), Some("requests"));
        assert_eq!(meta.version.as_deref(), Some("2.31.0"));
        assert_eq!(
            meta.requires_dist,
            vec!["charset-normalizer (<4,>=2)", "idna (<4,>=2.5)"]
        );
    }

    #[test]
    fn test_platform_markers_are_kept() {
        let meta = parse_metadata("Name: click\nRequires-Dist: colorama; platform_system == \"Windows\"\n");
        assert_eq!(meta.requires_dist.len(), 1);
    }

    #[test]
    fn test_extra_marker_matched_as_variable() {
        assert!(is_extra_only("pytest; extra == 'test'"));
        assert!(is_extra_only("pytest ; python_version >= '3.8' and extra=='test'"));
        assert!(is_extra_only("pytest; 'test' == extra"));

        assert!(!is_extra_only("foo; platform_release == \"extra\""));
        assert!(!is_extra_only("foo; platform_release == 'extra-kernel'"));
        assert!(!is_extra_only("extras-helper>=1"));

        let meta = parse_metadata("Name: x\nRequires-Dist: foo; platform_release == \"extra\"\n");
        assert_eq!(meta.requires_dist, vec!["foo; platform_release == \"extra\""]);
    }

    #[test]
    fn test_parse_requires_txt() {
        let content = "six>=1.5\n\n# pinned\nattrs\n[test]\npytest\n";
        assert_eq!(parse_requires_txt(content), vec!["six>=1.5", "attrs"]);
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_dist_info(
            dir.path(),
            "flask-3.0.0.dist-info",
            "Name: Flask\nVersion: 3.0.0\nRequires-Dist: Werkzeug>=3.0.0\n",
        );
        write_dist_info(dir.path(), "werkzeug-3.0.1.dist-info", "Name: Werkzeug\nVersion: 3.0.1\n");
        fs::create_dir_all(dir.path().join("flask")).unwrap();

        let set = load_dir(dir.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.lookup("flask").unwrap().requirements(), ["Werkzeug>=3.0.0"]);
        assert_eq!(set.lookup("werkzeug").unwrap().label(), "Werkzeug-3.0.1");
    }

    #[test]
    fn test_load_egg_info() {
        let dir = tempfile::tempdir().unwrap();
        let egg = dir.path().join("legacy-0.1.egg-info");
        fs::create_dir_all(&egg).unwrap();
        fs::write(egg.join("PKG-INFO"), "Name: legacy\nVersion: 0.1\n").unwrap();
        fs::write(egg.join("requires.txt"), "six\n[docs]\nsphinx\n").unwrap();

        let set = load_dir(dir.path()).unwrap();
        assert_eq!(set.lookup("legacy").unwrap().requirements(), ["six"]);
    }

    #[test]
    fn test_nameless_and_duplicate_distributions_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_dist_info(dir.path(), "a-1.0.dist-info", "Name: six\nVersion: 1.15.0\n");
        write_dist_info(dir.path(), "b-1.0.dist-info", "Name: six\nVersion: 1.16.0\n");
        write_dist_info(dir.path(), "c-1.0.dist-info", "Version: 1.0\n");

        let set = load_dir(dir.path()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.lookup("six").unwrap().installed_version(), Some("1.15.0"));
    }

    #[test]
    fn test_missing_metadata_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("broken-1.0.dist-info")).unwrap();

        assert!(matches!(load_dir(dir.path()), Err(ResolutionError::Io { .. })));
    }

    #[test]
    fn test_missing_directory() {
        let result = load_dir(Path::new("/nonexistent/site-packages"));
        assert!(matches!(result, Err(ResolutionError::MissingDirectory(_))));
    }
}
