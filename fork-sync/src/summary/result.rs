//! Per-commit migration results.

use crate::types::PrNumber;

/// Outcome of migrating one upstream commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    /// Whether the downstream PR was merged.
    pub succeeded: bool,

    /// The downstream PR, when one was opened.
    pub resulting_pr: Option<PrNumber>,

    /// The upstream PR the commit came from.
    pub source_pr: Option<PrNumber>,

    /// Short upstream commit hash, used when there is no source PR.
    pub source_sha: String,

    /// Upstream commit page.
    pub source_url: String,

    /// Login (or name) of the upstream author.
    pub author_login: String,

    /// Why the migration did not succeed.
    pub reason: Option<String>,
}

impl SyncResult {
    /// Whether the migration failed.
    #[must_use]
    pub fn failed(&self) -> bool {
        !self.succeeded
    }
}
