//! Store paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "site";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("store path is empty")]
    Empty,
    #[error("invalid path segment: {0:?}")]
    InvalidSegment(String),
}

/// A validated, slash-separated key path inside the remote store.
///
/// Segments are non-empty, made of ASCII alphanumerics, `-` and `_`, and may
/// not start with a dot, so a path can double as a relative file name on the
/// server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorePath(String);

impl StorePath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }
        for segment in trimmed.split('/') {
            validate_segment(segment)?;
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn join(&self, segment: &str) -> Result<Self, PathError> {
        validate_segment(segment)?;
        Ok(Self(format!("{}/{}", self.0, segment)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

fn validate_segment(segment: &str) -> Result<(), PathError> {
    let valid = !segment.is_empty()
        && !segment.starts_with('.')
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PathError::InvalidSegment(segment.to_string()))
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StorePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StorePath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StorePath> for String {
    fn from(path: StorePath) -> Self {
        path.0
    }
}

/// The two paths holding the site: one for content, one for the theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub content: StorePath,
    pub theme: StorePath,
}

impl StorePaths {
    pub fn under(namespace: &str) -> Result<Self, PathError> {
        let root = StorePath::parse(namespace)?;
        Ok(Self {
            content: root.join("content")?,
            theme: root.join("theme")?,
        })
    }
}

impl Default for StorePaths {
    fn default() -> Self {
        Self {
            content: StorePath(format!("{}/content", DEFAULT_NAMESPACE)),
            theme: StorePath(format!("{}/theme", DEFAULT_NAMESPACE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_slashes() {
        let path = StorePath::parse("/site/content/").unwrap();
        assert_eq!(path.as_str(), "site/content");
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["site", "content"]);
    }

    #[test]
    fn test_parse_rejects_traversal_and_junk() {
        assert_eq!(StorePath::parse(""), Err(PathError::Empty));
        assert_eq!(StorePath::parse("///"), Err(PathError::Empty));
        assert!(StorePath::parse("site/../etc").is_err());
        assert!(StorePath::parse("site//content").is_err());
        assert!(StorePath::parse("site/.hidden").is_err());
        assert!(StorePath::parse("site/con tent").is_err());
    }

    #[test]
    fn test_default_paths() {
        let paths = StorePaths::default();
        assert_eq!(paths.content.as_str(), "site/content");
        assert_eq!(paths.theme.as_str(), "site/theme");
        assert_eq!(StorePaths::under(DEFAULT_NAMESPACE).unwrap(), paths);
    }

    #[test]
    fn test_custom_namespace() {
        let paths = StorePaths::under("staging/acme").unwrap();
        assert_eq!(paths.content.as_str(), "staging/acme/content");
        assert_eq!(paths.theme.as_str(), "staging/acme/theme");
        assert!(StorePaths::under("bad name").is_err());
    }

    #[test]
    fn test_serde_validates() {
        let path: StorePath = serde_json::from_str("\"site/theme\"").unwrap();
        assert_eq!(path.as_str(), "site/theme");
        assert!(serde_json::from_str::<StorePath>("\"../x\"").is_err());
    }
}
