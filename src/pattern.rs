//! File-name pattern matching for the disk loader.
//!
//! Load paths ask for files with patterns such as `manifests/*.yaml`. A
//! pattern is split into a literal directory part and a glob applied to file
//! names inside that directory; matching never descends into subdirectories.
//!
//! # Pattern Syntax
//!
//! The file-name part uses standard glob syntax from the `glob` crate:
//!
//! - `*` matches any sequence of characters
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match character sets and ranges
//!
//! Matching is case-sensitive: `*.yaml` does not match `CONFIG.YAML`. A
//! leading `*` also matches dotfiles, so `*.yaml` matches `.extra.yaml`.
//!
//! # Security
//!
//! Patterns containing `..` or starting with `/` are rejected so a fetch can
//! never leave the asset directory.

use glob::{MatchOptions, Pattern};
use std::io;

use crate::core::ManifestError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled matcher for one `dir/name-glob` pattern.
///
/// # Examples
///
/// ```rust
/// use kubeboot::pattern::PatternMatcher;
///
/// # fn example() -> Result<(), kubeboot::core::ManifestError> {
/// let matcher = PatternMatcher::new("manifests/*.yaml")?;
/// assert_eq!(matcher.dir(), "manifests");
/// assert!(matcher.matches_name("cluster-config.yaml"));
/// assert!(!matcher.matches_name("cluster-config.yml"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    dir: String,
    name: Pattern,
}

impl PatternMatcher {
    /// Compile a pattern, validating it first with [`validate_pattern_safety`].
    pub fn new(pattern_str: &str) -> Result<Self, ManifestError> {
        validate_pattern_safety(pattern_str)?;

        let (dir, name) = split_pattern(pattern_str);
        let name = Pattern::new(name).map_err(|e| ManifestError::Io {
            pattern: pattern_str.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
        })?;

        Ok(Self {
            dir: dir.to_string(),
            name,
        })
    }

    /// Directory the pattern applies to, relative to the asset root.
    /// Empty for patterns without a directory part.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Check whether a bare file name matches the name glob.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.matches_with(name, MATCH_OPTIONS)
    }

    /// Check whether a full relative path (`dir/name`) matches.
    pub fn matches_path(&self, path: &str) -> bool {
        let (dir, name) = split_pattern(path);
        dir == self.dir && self.matches_name(name)
    }
}

/// Split `dir/name` into its directory and final component.
fn split_pattern(pattern: &str) -> (&str, &str) {
    match pattern.rsplit_once('/') {
        Some((dir, name)) => (dir.trim_end_matches('/'), name),
        None => ("", pattern),
    }
}

/// Reject patterns that could reach outside the asset directory.
pub fn validate_pattern_safety(pattern: &str) -> Result<(), ManifestError> {
    let reject = |reason: &str| ManifestError::Io {
        pattern: pattern.to_string(),
        source: io::Error::new(io::ErrorKind::InvalidInput, reason.to_string()),
    };

    if pattern.is_empty() {
        return Err(reject("pattern is empty"));
    }

    if pattern.split('/').any(|part| part == "..") {
        return Err(reject("pattern contains path traversal (..)"));
    }

    if pattern.starts_with('/') || pattern.starts_with('\\') {
        return Err(reject("pattern contains absolute path"));
    }

    let (dir, _) = split_pattern(pattern);
    if dir.contains(['*', '?', '[']) {
        return Err(reject("only the file name part may contain wildcards"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_patterns_are_case_sensitive() {
        let matcher = PatternMatcher::new("manifests/*.yaml").unwrap();
        assert!(matcher.matches_name("cvo-overrides.yaml"));
        assert!(!matcher.matches_name("cvo-overrides.YAML"));
        assert!(!matcher.matches_name("cvo-overrides.yml"));
        assert!(!matcher.matches_name("cvo-overrides.yaml.template"));
    }

    #[test]
    fn test_wildcard_matches_dotfiles() {
        let matcher = PatternMatcher::new("manifests/*.yaml").unwrap();
        assert!(matcher.matches_name(".cluster-config.yaml"));
        assert!(!matcher.matches_name(".cluster-config.yaml.tmp"));
    }

    #[test]
    fn test_matches_path_requires_same_directory() {
        let matcher = PatternMatcher::new("manifests/*.json").unwrap();
        assert!(matcher.matches_path("manifests/policy.json"));
        assert!(!matcher.matches_path("openshift/policy.json"));
        assert!(!matcher.matches_path("manifests/nested/policy.json"));
    }

    #[test]
    fn test_pattern_without_directory() {
        let matcher = PatternMatcher::new("install-config.yaml").unwrap();
        assert_eq!(matcher.dir(), "");
        assert!(matcher.matches_path("install-config.yaml"));
    }

    #[test]
    fn test_unsafe_patterns_rejected() {
        assert!(PatternMatcher::new("../etc/*.yaml").is_err());
        assert!(PatternMatcher::new("manifests/../../*.yaml").is_err());
        assert!(PatternMatcher::new("/etc/*.yaml").is_err());
        assert!(PatternMatcher::new("*/cluster-config.yaml").is_err());
        assert!(PatternMatcher::new("").is_err());
    }

    #[test]
    fn test_invalid_glob_is_io_error_with_pattern() {
        let err = PatternMatcher::new("manifests/[.yaml").unwrap_err();
        match err {
            ManifestError::Io { pattern, source } => {
                assert_eq!(pattern, "manifests/[.yaml");
                assert_eq!(source.kind(), io::ErrorKind::InvalidInput);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
