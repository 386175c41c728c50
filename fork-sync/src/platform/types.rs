//! Pull request data returned by the code host.

use crate::types::PrNumber;

/// The parts of a pull request the sync pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Number within its repository.
    pub number: PrNumber,

    /// Title.
    pub title: String,

    /// Description, if any.
    pub body: Option<String>,

    /// Computed mergeability. `None` while the host is still computing it.
    pub mergeable: Option<bool>,
}

/// Fields for opening a pull request.
#[derive(Debug, Clone, Copy)]
pub struct NewPullRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
    /// Branch carrying the changes.
    pub head: &'a str,
    /// Branch to merge into.
    pub base: &'a str,
}

/// Result of a merge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Whether the host merged the pull request.
    pub merged: bool,

    /// Merge commit, when merged.
    pub sha: Option<String>,

    /// Message returned by the host.
    pub message: Option<String>,
}
