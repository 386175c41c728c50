//! Template renderer.

use super::{TemplateError, CONFLICT_COMMENT_TEMPLATE, SUMMARY_TEMPLATE, SUMMARY_TITLE};
use handlebars::{no_escape, Handlebars};
use serde::Serialize;

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Values for the conflict resolution comment.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictComment<'a> {
    /// Login to mention, or empty when the author is not an org member.
    pub mention: &'a str,
    /// Enterprise repository in `owner/name` form.
    pub enterprise_repo: String,
    /// Directory name of an enterprise clone.
    pub enterprise_name: &'a str,
    pub branch: &'a str,
    pub base_branch: &'a str,
    /// Upstream mailbox patch.
    pub patch_url: String,
    /// Paths git reported as conflicting.
    pub conflict_files: &'a [String],
}

/// Values for the summary notification.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryMessage<'a> {
    /// Entries for merged migrations.
    pub succeeded: &'a [String],
    /// Entries for failed migrations.
    pub failed: &'a [String],
}

/// Renders the markdown bodies the sync posts.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the comment explaining how to resolve a conflicting patch.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_conflict_comment(
        &self,
        comment: &ConflictComment<'_>,
    ) -> Result<String, TemplateError> {
        self.handlebars
            .render_template(CONFLICT_COMMENT_TEMPLATE, comment)
            .map_err(|source| TemplateError::RenderError {
                template: "conflict comment",
                source,
            })
    }

    /// Renders the summary message. Empty sections read `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_summary(&self, message: &SummaryMessage<'_>) -> Result<String, TemplateError> {
        let section = |entries: &[String]| {
            if entries.is_empty() {
                "None".to_string()
            } else {
                entries.join("\n\n")
            }
        };
        let data = serde_json::json!({
            "title": SUMMARY_TITLE,
            "succeeded": section(message.succeeded),
            "failed": section(message.failed),
        });

        let text = self
            .handlebars
            .render_template(SUMMARY_TEMPLATE, &data)
            .map_err(|source| TemplateError::RenderError {
                template: "summary",
                source,
            })?;
        Ok(text.trim_end().to_string())
    }
}
