//! Run-wide settings from the `[sync]` table.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Settings shared by every repository pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SyncSettings {
    /// Label added to every migrated PR.
    pub label: String,

    /// Committer name configured in the working copy.
    pub bot_name: String,

    /// Committer email configured in the working copy.
    pub bot_email: String,

    /// Parent directory for working copies. A temporary directory is used when unset.
    pub work_dir: Option<PathBuf>,

    /// Seconds to wait before reading a new PR's mergeability.
    pub mergeability_delay_secs: u64,

    /// Only enterprise commits by this login can mark the sync boundary.
    pub trusted_committer: Option<String>,
}

impl SyncSettings {
    /// Returns the mergeability delay as a [`Duration`].
    #[must_use]
    pub fn mergeability_delay(&self) -> Duration {
        Duration::from_secs(self.mergeability_delay_secs)
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            label: "auto-sync".to_string(),
            bot_name: "fork-sync-bot".to_string(),
            bot_email: "fork-sync-bot@users.noreply.github.com".to_string(),
            work_dir: None,
            mergeability_delay_secs: 2,
            trusted_committer: None,
        }
    }
}
