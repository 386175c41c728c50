//! Commit records used to reconcile two histories.
//!
//! A [`CommitRecord`] pairs a [`SourceCommit`] with the title and PR number
//! parsed from its message. Histories are matched on titles, never on hashes.

mod message;
mod source;

pub use message::{parse_commit_message, ParsedMessage};
pub use source::{ChangedFile, CommitAuthor, FileStatus, SourceCommit};

use crate::types::PrNumber;

/// A commit together with the title and PR number derived from its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    source: SourceCommit,
    title: Option<String>,
    pr_number: Option<PrNumber>,
}

impl CommitRecord {
    /// Builds a record by parsing the commit message.
    #[must_use]
    pub fn new(source: SourceCommit) -> Self {
        let parsed = parse_commit_message(&source.message);
        let (title, pr_number) = match parsed {
            Some(ParsedMessage { title, pr_number }) => (Some(title), pr_number),
            None => (None, None),
        };
        Self {
            source,
            title,
            pr_number,
        }
    }

    /// The underlying commit.
    #[must_use]
    pub fn source(&self) -> &SourceCommit {
        &self.source
    }

    /// Normalized title, if the message could be parsed.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Originating pull request, if the title carried a marker.
    #[must_use]
    pub fn pr_number(&self) -> Option<PrNumber> {
        self.pr_number
    }

    /// Whether the record can take part in matching.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.pr_number.is_some() || self.title.is_some()
    }

    /// Case-insensitive title comparison.
    #[must_use]
    pub fn has_same_title(&self, other: &CommitRecord) -> bool {
        match (self.title(), other.title()) {
            (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
            _ => false,
        }
    }

    /// Account login of the author, falling back to the git author name.
    #[must_use]
    pub fn author_login(&self) -> &str {
        self.source
            .author
            .login
            .as_deref()
            .unwrap_or(&self.source.author.name)
    }
}
