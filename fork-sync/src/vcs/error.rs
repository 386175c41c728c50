//! Version control error types.

use thiserror::Error;

/// Errors that can occur while running git.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The git process could not be started.
    #[error("Failed to execute {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// git exited with a failure status.
    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Preparing the working directory failed.
    #[error("Failed to prepare '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
