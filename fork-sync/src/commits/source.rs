//! Commit data fetched from the code host.

use serde::{Deserialize, Serialize};

/// Author identity recorded on a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitAuthor {
    /// Git author name.
    pub name: String,

    /// Git author email.
    pub email: String,

    /// Platform account login, if the email maps to an account.
    pub login: Option<String>,
}

/// A commit as listed by the code host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCommit {
    /// Full commit hash.
    pub sha: String,

    /// Full commit message.
    pub message: String,

    /// Original author.
    pub author: CommitAuthor,

    /// Web URL of the commit.
    pub html_url: String,
}

impl SourceCommit {
    /// URL of the single-commit mailbox patch.
    #[must_use]
    pub fn patch_url(&self) -> String {
        format!("{}.patch", self.html_url)
    }

    /// First seven characters of the hash.
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

/// How a commit changed a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
}

/// A file touched by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChangedFile {
    /// Repository-relative path.
    pub filename: String,

    /// Change kind.
    pub status: FileStatus,

    /// URL of the file content at the commit. Absent for removed files.
    pub raw_url: Option<String>,

    /// Path before a rename.
    #[serde(default)]
    pub previous_filename: Option<String>,
}
