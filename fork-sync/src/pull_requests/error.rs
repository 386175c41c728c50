//! Pull request error types.

use thiserror::Error;

/// Errors that can occur while migrating a commit as a pull request.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The commit title carries no `(#N)` marker.
    #[error("Commit {sha} does not reference a source pull request")]
    NoSourcePullRequest { sha: String },

    /// Code host error.
    #[error(transparent)]
    Platform(#[from] crate::platform::PlatformError),

    /// Applying the patch failed.
    #[error(transparent)]
    Patch(#[from] crate::patch::PatchError),

    /// Rendering the conflict comment failed.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// The derived branch name is not a valid reference.
    #[error("Invalid branch name '{branch}': {message}")]
    InvalidBranch { branch: String, message: String },
}
