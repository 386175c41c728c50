//! Applying one upstream commit to the enterprise working copy.
//!
//! The patch is applied with a three-way mailbox apply. When that fails, every
//! file the commit touched is overwritten with its upstream content and the
//! result is committed under the original author. The branch is pushed either
//! way so a human can pick it up.

mod error;

pub use error::PatchError;

use crate::commits::{ChangedFile, CommitRecord, FileStatus};
use crate::platform::CodeHost;
use crate::types::RepoId;
use crate::vcs::{ApplyOutcome, CommitIdentity, WorkingCopy, ORIGIN};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, info_span, warn, Instrument};

/// How a commit ended up on its branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The patch applied without conflicts.
    Clean,

    /// The patch conflicted and touched files were overwritten.
    Fallback {
        /// Paths git reported as conflicting.
        conflict_files: Vec<String>,
    },
}

impl PatchOutcome {
    /// Whether the fallback path was taken and a human must review.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Applies commits to a working copy.
pub struct PatchApplier<'a> {
    host: &'a dyn CodeHost,
    working_copy: &'a dyn WorkingCopy,
}

impl<'a> PatchApplier<'a> {
    /// Creates an applier over a shared working copy.
    pub fn new(host: &'a dyn CodeHost, working_copy: &'a dyn WorkingCopy) -> Self {
        Self { host, working_copy }
    }

    /// Applies `record` on a fresh `branch` cut from `origin/<base_branch>` and pushes it.
    ///
    /// # Arguments
    ///
    /// * `source_repo` - Repository the commit came from
    /// * `record` - Commit to apply
    /// * `branch` - Branch to create
    /// * `base_branch` - Enterprise default branch
    ///
    /// # Errors
    ///
    /// Returns [`PatchError`] if fetching, writing, committing or pushing fails.
    /// A conflicting patch is not an error.
    pub async fn apply(
        &self,
        source_repo: &RepoId,
        record: &CommitRecord,
        branch: &str,
        base_branch: &str,
    ) -> Result<PatchOutcome, PatchError> {
        let span = info_span!("apply_commit", branch, sha = %record.source().short_sha());

        async {
            info!("Applying patch");

            self.working_copy.fetch(ORIGIN, base_branch).await?;
            self.working_copy
                .checkout_new_branch(branch, &format!("{ORIGIN}/{base_branch}"))
                .await?;

            let patch = self.host.fetch_patch(record.source()).await?;
            let patch_path = self.working_copy.root().join(format!("{branch}.patch"));
            tokio::fs::write(&patch_path, patch)
                .await
                .map_err(|source| PatchError::IoError {
                    path: patch_path.display().to_string(),
                    source,
                })?;

            let applied = self.working_copy.apply_mailbox(&patch_path).await;
            if let Err(e) = tokio::fs::remove_file(&patch_path).await {
                warn!(path = %patch_path.display(), error = %e, "Failed to remove patch file");
            }

            let outcome = match applied? {
                ApplyOutcome::Applied => {
                    info!("Patch applied cleanly");
                    PatchOutcome::Clean
                }
                ApplyOutcome::Conflict { conflict_files } => {
                    warn!(?conflict_files, "Patch conflicted, overwriting touched files");
                    if let Err(e) = self.working_copy.abort_apply().await {
                        warn!(error = %e, "Failed to abort mailbox apply");
                    }
                    self.overwrite_touched_files(source_repo, record).await?;
                    self.commit_as_source_author(record).await?;
                    PatchOutcome::Fallback { conflict_files }
                }
            };

            self.working_copy.push_upstream(ORIGIN, branch).await?;
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    /// Makes every file the commit touched match its upstream state.
    async fn overwrite_touched_files(
        &self,
        source_repo: &RepoId,
        record: &CommitRecord,
    ) -> Result<(), PatchError> {
        let files = self
            .host
            .list_commit_files(source_repo, &record.source().sha)
            .await?;

        for file in &files {
            if file.status == FileStatus::Removed {
                self.remove(&file.filename).await?;
            } else {
                if file.status == FileStatus::Renamed {
                    if let Some(previous) = &file.previous_filename {
                        self.remove(previous).await?;
                    }
                }
                self.write_upstream_content(file).await?;
            }
            debug!(path = %file.filename, status = ?file.status, "Overwrote file");
        }

        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), PatchError> {
        let local = self.local_path(path)?;
        if local.exists() {
            self.working_copy.remove_path(path).await?;
        }
        Ok(())
    }

    async fn write_upstream_content(&self, file: &ChangedFile) -> Result<(), PatchError> {
        let raw_url = file
            .raw_url
            .as_deref()
            .ok_or_else(|| PatchError::MissingContent {
                path: file.filename.clone(),
            })?;
        let content = self.host.fetch_raw_file(raw_url).await?;

        let local = self.local_path(&file.filename)?;
        let io_error = |source| PatchError::IoError {
            path: local.display().to_string(),
            source,
        };
        if let Some(parent) = local.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(&local, content).await.map_err(io_error)?;
        Ok(())
    }

    async fn commit_as_source_author(&self, record: &CommitRecord) -> Result<(), PatchError> {
        let author = &record.source().author;
        info!(email = %author.email, "Committing changes as original author");
        self.working_copy.stage_all().await?;
        self.working_copy
            .commit_as(
                record.title().unwrap_or_default(),
                &CommitIdentity::new(&author.name, &author.email),
            )
            .await?;
        Ok(())
    }

    fn local_path(&self, path: &str) -> Result<PathBuf, PatchError> {
        resolve_in(self.working_copy.root(), path)
    }
}

/// Resolves a repository-relative path under `root`.
///
/// Only plain relative paths are accepted: no `..`, no root, no prefix.
fn resolve_in(root: &Path, path: &str) -> Result<PathBuf, PatchError> {
    let relative = Path::new(path);
    let is_plain = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if path.is_empty() || !is_plain {
        return Err(PatchError::UnsafePath {
            path: path.to_string(),
        });
    }
    Ok(root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_nested_paths_under_root() {
        let root = Path::new("/work/widgets-ent");
        assert_eq!(
            resolve_in(root, "src/lib.rs").unwrap(),
            root.join("src").join("lib.rs")
        );
    }

    #[test]
    fn rejects_paths_leaving_the_working_copy() {
        let root = Path::new("/work/widgets-ent");
        for path in ["../x", "src/../../x", "/etc/passwd", ""] {
            assert!(
                matches!(resolve_in(root, path), Err(PatchError::UnsafePath { .. })),
                "{path:?} should be rejected"
            );
        }
    }

    #[test]
    fn only_fallback_is_stopped() {
        assert!(!PatchOutcome::Clean.is_stopped());
        assert!(PatchOutcome::Fallback {
            conflict_files: Vec::new()
        }
        .is_stopped());
    }
}
