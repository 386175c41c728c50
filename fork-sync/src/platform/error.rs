//! Code host error types.

use thiserror::Error;

/// Errors that can occur while talking to the code host.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// A raw HTTP request failed.
    #[error("Request to '{url}' failed: {source}")]
    HttpError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    ClientError(#[source] reqwest::Error),

    /// A response was missing data the caller relies on.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },
}
