//! Repository pair sections.

use crate::types::RepoId;
use serde::Deserialize;

/// One `[repos.<name>]` section as written in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct RawRepoPair {
    pub community_repo: String,
    pub enterprise_repo: String,
    pub default_branch: Option<String>,
}

/// A community repository and the enterprise fork it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPairConfig {
    /// Section name, used in logs and the run summary.
    pub name: String,

    /// Upstream repository commits are read from.
    pub community: RepoId,

    /// Fork that receives the migrated pull requests.
    pub enterprise: RepoId,

    /// Overrides the enterprise repository's default branch.
    pub default_branch: Option<String>,
}
