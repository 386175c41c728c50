//! Outgoing run notifications.
//!
//! One markdown message is sent per repository pair that attempted at least
//! one migration. [`WebhookNotifier`] posts to a chat-bot webhook;
//! [`LogNotifier`] is used when no webhook is configured.

mod error;
mod webhook;

pub use error::NotifyError;
pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use tracing::info;

/// A markdown message for the notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub markdown: String,
}

/// Delivers run notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes notifications to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            title = %notification.title,
            "Notification disabled, message follows:\n{}",
            notification.markdown
        );
        Ok(())
    }
}
