#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod commits;
pub mod config;
pub mod context;
pub mod history;
pub mod notify;
pub mod patch;
pub mod platform;
pub mod pull_requests;
pub mod rate_limit;
pub mod runner;
pub mod summary;
pub mod templates;
pub mod types;
pub mod vcs;

pub use commits::{parse_commit_message, CommitRecord, ParsedMessage, SourceCommit};
pub use config::{load_config, parse_config, ConfigError, RepoPairConfig, SyncConfig, SyncSettings};
pub use context::SyncContext;
pub use history::{fetch_recent_commits, find_unmerged_commits, HistoryDiffer, HISTORY_WINDOW};
pub use notify::{LogNotifier, Notification, Notifier, NotifyError, WebhookNotifier};
pub use patch::{PatchApplier, PatchError, PatchOutcome};
pub use platform::{CodeHost, GitHubHost, PlatformError, PullRequest};
pub use pull_requests::{migrate_commit, MigrationTarget, SyncError};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{PairReport, RunSummary, SyncResult};
pub use templates::{create_handlebars_registry, TemplateError, TemplateRenderer};
pub use types::{PrNumber, RepoId};
pub use vcs::{ApplyOutcome, Cloner, GitCli, GitWorkingCopy, VcsError, WorkingCopy};
