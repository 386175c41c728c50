//! Shared value types.
//!
//! - [`RepoId`] - A repository in `owner/name` form
//! - [`PrNumber`] - The number of a pull request within a repository

use serde::Serialize;
use std::fmt;

/// A repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoId {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepoId {
    /// Creates a repository identifier from its parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parses an `owner/name` string.
    ///
    /// Returns `None` unless the input has exactly two non-empty segments.
    #[must_use]
    pub fn parse(full_name: &str) -> Option<Self> {
        let mut parts = full_name.trim().split('/');
        let owner = parts.next()?.trim();
        let name = parts.next()?.trim();
        if parts.next().is_some() || owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(owner, name))
    }

    /// Returns the `owner/name` form.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Number of a pull request (or issue) within a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PrNumber(pub u64);

impl PrNumber {
    /// Returns the raw number.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PrNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
