//! Notification error types.

use thiserror::Error;

/// Errors that can occur while sending a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The webhook URL could not be parsed.
    #[error("Invalid webhook URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP request failed.
    #[error("Webhook request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The webhook answered with an error code.
    #[error("Webhook rejected the message ({code}): {message}")]
    Rejected { code: i64, message: String },
}
