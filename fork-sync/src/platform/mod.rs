//! Code hosting platform access.
//!
//! [`CodeHost`] is the seam between the sync pipeline and the platform. The
//! production implementation is [`GitHubHost`]; tests provide their own.

mod error;
mod github;
mod types;

pub use error::PlatformError;
pub use github::GitHubHost;
pub use types::{MergeOutcome, NewPullRequest, PullRequest};

use crate::commits::{ChangedFile, SourceCommit};
use crate::types::{PrNumber, RepoId};
use async_trait::async_trait;

/// Base URL for web links.
pub const GITHUB_URL: &str = "https://github.com";

/// Operations the sync pipeline needs from the code host.
#[async_trait]
pub trait CodeHost: Send + Sync {
    /// Logins of every member of an organization.
    async fn list_org_members(&self, org: &str) -> Result<Vec<String>, PlatformError>;

    /// Name of the repository's default branch.
    async fn default_branch(&self, repo: &RepoId) -> Result<String, PlatformError>;

    /// Up to `limit` commits of the default branch, newest first.
    async fn list_recent_commits(
        &self,
        repo: &RepoId,
        limit: usize,
    ) -> Result<Vec<SourceCommit>, PlatformError>;

    /// Files changed by a commit.
    async fn list_commit_files(
        &self,
        repo: &RepoId,
        sha: &str,
    ) -> Result<Vec<ChangedFile>, PlatformError>;

    /// Mailbox patch of a single commit, byte for byte.
    async fn fetch_patch(&self, commit: &SourceCommit) -> Result<Vec<u8>, PlatformError>;

    /// Raw file content from a content URL.
    async fn fetch_raw_file(&self, raw_url: &str) -> Result<Vec<u8>, PlatformError>;

    async fn get_pull_request(
        &self,
        repo: &RepoId,
        number: PrNumber,
    ) -> Result<PullRequest, PlatformError>;

    async fn create_pull_request(
        &self,
        repo: &RepoId,
        pull_request: NewPullRequest<'_>,
    ) -> Result<PullRequest, PlatformError>;

    /// Adds existing labels to an issue or pull request.
    async fn add_labels(
        &self,
        repo: &RepoId,
        number: PrNumber,
        labels: &[String],
    ) -> Result<(), PlatformError>;

    /// Posts a comment on an issue or pull request.
    async fn create_comment(
        &self,
        repo: &RepoId,
        number: PrNumber,
        body: &str,
    ) -> Result<(), PlatformError>;

    /// Squash-merges a pull request with the given commit title.
    async fn squash_merge(
        &self,
        repo: &RepoId,
        number: PrNumber,
        commit_title: &str,
    ) -> Result<MergeOutcome, PlatformError>;
}
