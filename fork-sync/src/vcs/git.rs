//! `git` command line backend.

use super::{
    parse_conflict_files, ApplyOutcome, Cloner, CommitIdentity, VcsError, WorkingCopy,
};
use crate::types::RepoId;
use async_trait::async_trait;
use bstr::ByteSlice;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Clones repositories over HTTPS with a token.
pub struct GitCli {
    token: String,
    identity: CommitIdentity,
}

impl GitCli {
    /// Creates a cloner that authenticates with `token` and commits as `identity`.
    pub fn new(token: impl Into<String>, identity: CommitIdentity) -> Self {
        Self {
            token: token.into(),
            identity,
        }
    }

    fn clone_url(&self, repo: &RepoId) -> String {
        format!(
            "https://x-access-token:{}@github.com/{}.git",
            self.token, repo
        )
    }
}

#[async_trait]
impl Cloner for GitCli {
    async fn clone_repository(
        &self,
        repo: &RepoId,
        dest: &Path,
    ) -> Result<Box<dyn WorkingCopy>, VcsError> {
        debug!(repo = %repo, dest = %dest.display(), "Cloning repository");

        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| VcsError::IoError {
                path: parent.display().to_string(),
                source,
            })?;

        let url = self.clone_url(repo);
        let dest_arg = dest.to_string_lossy();
        let label = format!("git clone {repo}");
        let output = spawn_git(parent, &["clone", "--single-branch", &url, &dest_arg], &label).await?;

        if !output.status.success() {
            // Keep the token out of logs.
            let stderr = output.stderr.to_str_lossy().replace(&self.token, "***");
            return Err(VcsError::CommandFailed {
                command: label,
                stderr,
            });
        }

        let working_copy = GitWorkingCopy::open(dest);
        working_copy.configure_identity(&self.identity).await?;
        Ok(Box::new(working_copy))
    }
}

/// A checkout driven through the `git` binary.
#[derive(Debug, Clone)]
pub struct GitWorkingCopy {
    root: PathBuf,
}

impl GitWorkingCopy {
    /// Wraps an existing checkout.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Sets the committer identity for this checkout.
    pub async fn configure_identity(&self, identity: &CommitIdentity) -> Result<(), VcsError> {
        self.git(&["config", "user.name", &identity.name]).await?;
        self.git(&["config", "user.email", &identity.email]).await?;
        Ok(())
    }

    /// Runs a git command in the checkout, failing on non-zero exit.
    async fn git(&self, args: &[&str]) -> Result<Output, VcsError> {
        let label = format!("git {}", args.join(" "));
        let output = spawn_git(&self.root, args, &label).await?;

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command: label,
                stderr: output.stderr.to_str_lossy().trim().to_string(),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl WorkingCopy for GitWorkingCopy {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn fetch(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        // Single-branch clones only track the default branch, so name the
        // destination ref explicitly.
        let refspec = format!("+refs/heads/{branch}:refs/remotes/{remote}/{branch}");
        self.git(&["fetch", remote, &refspec]).await?;
        Ok(())
    }

    async fn checkout_new_branch(
        &self,
        branch: &str,
        start_point: &str,
    ) -> Result<(), VcsError> {
        debug!(branch, start_point, "Creating branch");
        self.git(&["checkout", "-b", branch, start_point]).await?;
        Ok(())
    }

    async fn apply_mailbox(&self, patch: &Path) -> Result<ApplyOutcome, VcsError> {
        let patch_arg = patch.to_string_lossy();
        let output = spawn_git(&self.root, &["am", "--3way", &patch_arg], "git am --3way").await?;

        if output.status.success() {
            return Ok(ApplyOutcome::Applied);
        }

        let mut report = output.stdout.to_str_lossy().into_owned();
        report.push('\n');
        report.push_str(&output.stderr.to_str_lossy());
        debug!(output = %report.trim(), "git am failed");

        Ok(ApplyOutcome::Conflict {
            conflict_files: parse_conflict_files(&report),
        })
    }

    async fn abort_apply(&self) -> Result<(), VcsError> {
        self.git(&["am", "--abort"]).await?;
        Ok(())
    }

    async fn remove_path(&self, path: &str) -> Result<(), VcsError> {
        self.git(&["rm", "-rf", "--ignore-unmatch", "--", path]).await?;
        Ok(())
    }

    async fn stage_all(&self) -> Result<(), VcsError> {
        self.git(&["add", "-A"]).await?;
        Ok(())
    }

    async fn commit_as(&self, message: &str, author: &CommitIdentity) -> Result<(), VcsError> {
        debug!(email = %author.email, "Committing changes");
        let author = author.to_author_string();
        self.git(&["commit", "-m", message, "--author", &author]).await?;
        Ok(())
    }

    async fn push_upstream(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        debug!(remote, branch, "Pushing branch");
        self.git(&["push", "-u", remote, branch]).await?;
        Ok(())
    }
}

/// Spawns git and captures its output.
async fn spawn_git(cwd: &Path, args: &[&str], label: &str) -> Result<Output, VcsError> {
    Command::new("git")
        .args(args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| VcsError::SpawnFailed {
            command: label.to_string(),
            source,
        })
}
