//! Rendering of conflict comments and summary notifications.
//!
//! Templates are markdown files compiled into the binary and rendered with
//! Handlebars.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, ConflictComment, SummaryMessage, TemplateRenderer};

/// Conflict resolution instructions posted on a fallback PR.
pub(crate) const CONFLICT_COMMENT_TEMPLATE: &str = include_str!("files/conflict-comment.md");

/// Per-pair run summary sent to the notification channel.
pub(crate) const SUMMARY_TEMPLATE: &str = include_str!("files/sync-summary.md");

/// Title of the summary notification.
pub const SUMMARY_TITLE: &str = "Auto Merge Status";
