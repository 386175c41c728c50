//! Patch application error types.

use crate::platform::PlatformError;
use crate::vcs::VcsError;
use thiserror::Error;

/// Errors that can occur while applying a commit to the working copy.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Fetching the patch or file contents failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// A git operation failed.
    #[error(transparent)]
    Vcs(#[from] VcsError),

    /// Reading or writing a local file failed.
    #[error("Failed to write '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A touched file has no downloadable content.
    #[error("No raw content available for '{path}'")]
    MissingContent { path: String },

    /// A touched path escapes the working copy.
    #[error("Refusing to write outside the working copy: '{path}'")]
    UnsafePath { path: String },
}
