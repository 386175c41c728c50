//! Chat-bot webhook notifier.

use super::{Notification, Notifier, NotifyError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

/// Reply body of the webhook.
#[derive(Debug, Deserialize)]
struct WebhookReply {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// Posts markdown messages to a DingTalk-style robot webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Url,
}

impl WebhookNotifier {
    /// Creates a notifier for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::InvalidUrl`] if the URL cannot be parsed.
    pub fn new(url: &str) -> Result<Self, NotifyError> {
        let url = Url::parse(url).map_err(|source| NotifyError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            url,
        })
    }
}

/// Builds the markdown message payload.
fn payload(notification: &Notification) -> serde_json::Value {
    json!({
        "msgtype": "markdown",
        "markdown": {
            "title": notification.title,
            "text": notification.markdown,
        },
        "at": { "isAtAll": false },
    })
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        debug!(host = ?self.url.host_str(), "Sending notification");
        let reply: WebhookReply = self
            .client
            .post(self.url.clone())
            .json(&payload(notification))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if reply.errcode != 0 {
            return Err(NotifyError::Rejected {
                code: reply.errcode,
                message: reply.errmsg,
            });
        }
        Ok(())
    }
}
