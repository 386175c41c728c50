//! Finding community commits that have not reached the enterprise fork.
//!
//! Both histories are read from a bounded window of recent commits and
//! matched by title. The newest enterprise commit whose title appears in the
//! community history marks the boundary; everything newer upstream is
//! unmerged. A gap wider than the window is invisible and yields nothing.

use crate::commits::CommitRecord;
use crate::platform::{CodeHost, PlatformError};
use crate::types::RepoId;
use tracing::{debug, warn};

/// Number of recent commits read from each side.
pub const HISTORY_WINDOW: usize = 101;

/// Reads the recent history of a repository, newest first.
///
/// Commits whose message cannot be parsed are dropped.
///
/// # Errors
///
/// Returns [`PlatformError`] if listing commits fails.
pub async fn fetch_recent_commits(
    host: &dyn CodeHost,
    repo: &RepoId,
) -> Result<Vec<CommitRecord>, PlatformError> {
    let commits = host.list_recent_commits(repo, HISTORY_WINDOW).await?;
    let records: Vec<CommitRecord> = commits
        .into_iter()
        .take(HISTORY_WINDOW)
        .map(CommitRecord::new)
        .filter(CommitRecord::is_valid)
        .collect();
    debug!(repo = %repo, count = records.len(), "Read recent history");
    Ok(records)
}

/// Matches an enterprise history against a community history.
#[derive(Debug, Clone, Default)]
pub struct HistoryDiffer {
    trusted_committer: Option<String>,
}

impl HistoryDiffer {
    /// Creates a differ that accepts a title match from any enterprise author.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only lets enterprise commits by `login` establish the boundary.
    #[must_use]
    pub fn with_trusted_committer(mut self, login: Option<String>) -> Self {
        self.trusted_committer = login;
        self
    }

    /// Returns community commits newer than the last one present downstream.
    ///
    /// Both inputs and the result are ordered newest first. Reverse the result
    /// before applying it.
    #[must_use]
    pub fn find_unmerged(
        &self,
        community: &[CommitRecord],
        enterprise: &[CommitRecord],
    ) -> Vec<CommitRecord> {
        for ent_commit in enterprise {
            let Some(index) = community
                .iter()
                .position(|comm_commit| ent_commit.has_same_title(comm_commit))
            else {
                continue;
            };

            if let Some(trusted) = &self.trusted_committer {
                if ent_commit.author_login() != trusted {
                    warn!(
                        title = ent_commit.title().unwrap_or_default(),
                        author = ent_commit.author_login(),
                        trusted = %trusted,
                        "Matching commit was checked in by another author, ignoring"
                    );
                    continue;
                }
            }

            debug!(
                title = ent_commit.title().unwrap_or_default(),
                unmerged = index,
                "Found boundary commit"
            );
            return community[..index].to_vec();
        }

        Vec::new()
    }
}

/// [`HistoryDiffer::find_unmerged`] with no committer restriction.
#[must_use]
pub fn find_unmerged_commits(
    community: &[CommitRecord],
    enterprise: &[CommitRecord],
) -> Vec<CommitRecord> {
    HistoryDiffer::new().find_unmerged(community, enterprise)
}
