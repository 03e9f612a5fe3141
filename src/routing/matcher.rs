//! Base path gate and asset path rewrite.
//!
//! # Responsibilities
//! - Decide whether a request path is mounted under the base path
//! - Strip the base path to obtain the asset path
//!
//! # Design Decisions
//! - Plain string prefix test, case-sensitive
//! - A remainder that does not begin with '/' is rooted, so
//!   "/basefoo" under "/base" rewrites to "/foo"
//! - An empty remainder rewrites to "/"

use std::fmt;

use thiserror::Error;

/// Reasons a configured base path is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BasePathError {
    #[error("base path must not be empty")]
    Empty,

    #[error("base path '{0}' must start with '/'")]
    NotAbsolute(String),

    #[error("base path '{0}' must not contain a query or fragment")]
    HasQuery(String),
}

/// Prefix under which all served content is mounted.
///
/// Trailing slashes are dropped, so `/a/b/` and `/a/b` gate identically.
/// The root mount `/` is stored as the empty prefix and admits every path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePath(String);

impl BasePath {
    /// Validate and normalize a configured base path.
    pub fn parse(raw: &str) -> Result<Self, BasePathError> {
        if raw.is_empty() {
            return Err(BasePathError::Empty);
        }
        if !raw.starts_with('/') {
            return Err(BasePathError::NotAbsolute(raw.to_string()));
        }
        if raw.contains(['?', '#']) {
            return Err(BasePathError::HasQuery(raw.to_string()));
        }
        Ok(Self(raw.trim_end_matches('/').to_string()))
    }

    /// The normalized prefix ("" for the root mount).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strip the prefix from `path`, or `None` when `path` is outside it.
    pub fn strip(&self, path: &str) -> Option<AssetPath> {
        let rest = path.strip_prefix(self.0.as_str())?;
        Some(AssetPath::rooted(rest))
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("/")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Request path relative to the base path. Always begins with '/'.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPath(String);

impl AssetPath {
    /// The SPA entry document path.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    fn rooted(rest: &str) -> Self {
        if rest.starts_with('/') {
            Self(rest.to_string())
        } else {
            Self(format!("/{rest}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path and query for the store fetch. An empty query is dropped.
    pub fn with_query(&self, query: Option<&str>) -> String {
        match query {
            Some(q) if !q.is_empty() => format!("{}?{}", self.0, q),
            _ => self.0.clone(),
        }
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
