//! Per-pair working directories.

use super::RunnerError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Directory that holds one pair's enterprise checkout for the duration of its sync.
///
/// The checkout is removed when the workspace is dropped.
pub(crate) enum Workspace {
    /// Checkout inside a private temporary directory.
    Temp { dir: TempDir, checkout: PathBuf },

    /// Checkout at `<work-dir>/<name>`.
    Fixed { checkout: PathBuf },
}

impl Workspace {
    /// Reserves a checkout path named `name`, removing any stale copy.
    pub(crate) async fn prepare(work_dir: Option<&Path>, name: &str) -> Result<Self, RunnerError> {
        let Some(work_dir) = work_dir else {
            let dir = tempfile::tempdir().map_err(|source| RunnerError::IoError {
                path: std::env::temp_dir().display().to_string(),
                source,
            })?;
            let checkout = dir.path().join(name);
            return Ok(Self::Temp { dir, checkout });
        };

        let checkout = work_dir.join(name);
        if tokio::fs::try_exists(&checkout).await.unwrap_or(false) {
            debug!(path = %checkout.display(), "Removing stale working copy");
            tokio::fs::remove_dir_all(&checkout)
                .await
                .map_err(|source| RunnerError::IoError {
                    path: checkout.display().to_string(),
                    source,
                })?;
        }
        Ok(Self::Fixed { checkout })
    }

    /// Where the repository should be cloned.
    pub(crate) fn checkout(&self) -> &Path {
        match self {
            Self::Temp { checkout, .. } | Self::Fixed { checkout } => checkout,
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        match self {
            Self::Temp { dir, .. } => debug!(path = %dir.path().display(), "Removing workspace"),
            Self::Fixed { checkout } => {
                if checkout.exists() {
                    if let Err(e) = std::fs::remove_dir_all(&*checkout) {
                        warn!(path = %checkout.display(), error = %e, "Failed to remove working copy");
                    }
                }
            }
        }
    }
}
