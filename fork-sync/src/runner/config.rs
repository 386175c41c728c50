//! Runner configuration.

use std::path::{Path, PathBuf};

/// Runtime settings for a sync run, collected from the command line.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the repository pair configuration.
    config_path: PathBuf,
    /// GitHub token used for API calls and pushes.
    token: String,
    /// Chat-bot webhook for summaries. Notifications are logged when unset.
    webhook_url: Option<String>,
    /// Whether to preview unmerged commits without changing anything.
    dry_run: bool,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(config_path: PathBuf, token: String) -> Self {
        Self {
            config_path,
            token,
            webhook_url: None,
            dry_run: false,
        }
    }

    /// Sets the notification webhook.
    pub fn with_webhook_url(mut self, webhook_url: Option<String>) -> Self {
        self.webhook_url = webhook_url.filter(|url| !url.trim().is_empty());
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the configuration file path.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the notification webhook, if any.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}
