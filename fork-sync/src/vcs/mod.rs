//! Local working copy operations.
//!
//! [`Cloner`] produces a [`WorkingCopy`] for a repository; the sync pipeline
//! only ever talks to these traits. [`GitCli`] implements both by shelling out
//! to `git`.

mod error;
mod git;

pub use error::VcsError;
pub use git::{GitCli, GitWorkingCopy};

use crate::types::RepoId;
use async_trait::async_trait;
use std::path::Path;

/// Remote name of the cloned repository.
pub const ORIGIN: &str = "origin";

/// Name and email recorded on a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl CommitIdentity {
    /// Creates an identity.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// `Name <email>` form accepted by `git commit --author`.
    #[must_use]
    pub fn to_author_string(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

/// Result of a three-way mailbox apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The patch was committed.
    Applied,

    /// The patch could not be applied.
    Conflict {
        /// Paths git reported as conflicting.
        conflict_files: Vec<String>,
    },
}

/// A local checkout that the sync pipeline mutates in place.
#[async_trait]
pub trait WorkingCopy: Send + Sync {
    /// Root directory of the checkout.
    fn root(&self) -> &Path;

    /// Updates the remote-tracking ref `<remote>/<branch>`, even for branches
    /// the clone does not track.
    async fn fetch(&self, remote: &str, branch: &str) -> Result<(), VcsError>;

    /// Creates `branch` from `start_point` and checks it out.
    async fn checkout_new_branch(&self, branch: &str, start_point: &str)
        -> Result<(), VcsError>;

    /// Applies a mailbox patch with three-way fallback.
    async fn apply_mailbox(&self, patch: &Path) -> Result<ApplyOutcome, VcsError>;

    /// Abandons an in-progress mailbox apply.
    async fn abort_apply(&self) -> Result<(), VcsError>;

    /// Removes a path from the index and the worktree.
    async fn remove_path(&self, path: &str) -> Result<(), VcsError>;

    async fn stage_all(&self) -> Result<(), VcsError>;

    /// Commits the index with an explicit author.
    async fn commit_as(&self, message: &str, author: &CommitIdentity) -> Result<(), VcsError>;

    /// Pushes `branch` and sets it as upstream.
    async fn push_upstream(&self, remote: &str, branch: &str) -> Result<(), VcsError>;
}

/// Creates working copies.
#[async_trait]
pub trait Cloner: Send + Sync {
    /// Clones `repo` into `dest`, which must not exist yet.
    async fn clone_repository(
        &self,
        repo: &RepoId,
        dest: &Path,
    ) -> Result<Box<dyn WorkingCopy>, VcsError>;
}

/// Extracts paths from `CONFLICT (...): Merge conflict in <path>` lines.
#[must_use]
pub fn parse_conflict_files(output: &str) -> Vec<String> {
    const MARKER: &str = ": Merge conflict in ";
    output
        .lines()
        .filter(|line| line.starts_with("CONFLICT ("))
        .filter_map(|line| line.split_once(MARKER).map(|(_, path)| path.trim()))
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect()
}
