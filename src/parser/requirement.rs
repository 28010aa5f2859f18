//! Requirement string parsing.
//!
//! Extracts the project name from a raw requirement declaration such as
//! `requests[socks]>=2.0; python_version >= "3.8"`. Version specifiers,
//! extras and environment markers are not interpreted.

/// A requirement string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid requirement {requirement:?}: {reason}")]
pub struct InvalidRequirement {
    /// The raw string as declared.
    pub requirement: String,
    /// Why the string was rejected.
    pub reason: String,
}

impl InvalidRequirement {
    pub fn new(requirement: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            requirement: requirement.into(),
            reason: reason.into(),
        }
    }
}

/// Turns a raw requirement string into a project name.
///
/// Implemented by [`Pep508Parser`] and by any closure with the matching
/// signature, so tests and callers can plug in their own rules.
pub trait RequirementParser {
    /// Returns the project name declared by `raw`.
    fn project_name(&self, raw: &str) -> Result<String, InvalidRequirement>;
}

impl<F> RequirementParser for F
where
    F: Fn(&str) -> Result<String, InvalidRequirement>,
{
    fn project_name(&self, raw: &str) -> Result<String, InvalidRequirement> {
        self(raw)
    }
}

/// Parser for PEP 508 style requirement strings.
///
/// # Example
///
/// ```
/// use reqgraph::parser::{Pep508Parser, RequirementParser};
///
/// let parser = Pep508Parser;
/// assert_eq!(parser.project_name("foo>=1.0").unwrap(), "foo");
/// assert_eq!(parser.project_name("Bar[extra] ; os_name == 'nt'").unwrap(), "Bar");
/// assert!(parser.project_name("not a valid req!!").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Pep508Parser;

/// Characters allowed to start the text that follows a project name.
const SPEC_START: &[char] = &['[', '(', '<', '>', '=', '!', '~', ';', '@', ','];

impl RequirementParser for Pep508Parser {
    fn project_name(&self, raw: &str) -> Result<String, InvalidRequirement> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidRequirement::new(raw, "empty requirement"));
        }

        let name_end = trimmed
            .char_indices()
            .find(|&(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());

        // Names must start and end with an alphanumeric character.
        let name = trimmed[..name_end].trim_end_matches(['.', '_', '-']);
        if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(InvalidRequirement::new(raw, "expected a project name"));
        }

        let rest = trimmed[name.len()..].trim_start();
        if !rest.is_empty() && !rest.starts_with(SPEC_START) {
            return Err(InvalidRequirement::new(
                raw,
                format!("unexpected text after project name: {rest:?}"),
            ));
        }

        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> Result<String, InvalidRequirement> {
        Pep508Parser.project_name(raw)
    }

    #[test]
    fn test_bare_name() {
        assert_eq!(name("six").unwrap(), "six");
        assert_eq!(name("  zope.interface  ").unwrap(), "zope.interface");
    }

    #[test]
    fn test_version_specifiers() {
        assert_eq!(name("foo>=1.0").unwrap(), "foo");
        assert_eq!(name("foo >= 1.0, < 2").unwrap(), "foo");
        assert_eq!(name("foo==1.*").unwrap(), "foo");
        assert_eq!(name("foo~=1.4").unwrap(), "foo");
        assert_eq!(name("foo!=1.5").unwrap(), "foo");
        assert_eq!(name("foo (>=1.0)").unwrap(), "foo");
        assert_eq!(name("foo, >=1").unwrap(), "foo");
        assert_eq!(name("foo,").unwrap(), "foo");
    }

    #[test]
    fn test_extras_markers_and_urls() {
        assert_eq!(name("requests[socks,security]>=2").unwrap(), "requests");
        assert_eq!(name("pywin32; sys_platform == 'win32'").unwrap(), "pywin32");
        assert_eq!(
            name("pip @ https://example.com/pip-23.0.tar.gz").unwrap(),
            "pip"
        );
    }

    #[test]
    fn test_invalid_requirements() {
        let err = name("not a valid req!!").unwrap_err();
        assert_eq!(err.requirement, "not a valid req!!");

        assert!(name("").is_err());
        assert!(name("   ").is_err());
        assert!(name(">=1.0").is_err());
        assert!(name("-foo").is_err());
        assert!(name("foo- bar").is_err());
        assert!(name("# comment").is_err());
    }

    #[test]
    fn test_closure_parser() {
        let upper = |raw: &str| -> Result<String, InvalidRequirement> { Ok(raw.to_uppercase()) };
        assert_eq!(upper.project_name("abc").unwrap(), "ABC");
    }
}
