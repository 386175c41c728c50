//! Template rendering error types.

/// Errors raised while rendering a comment or notification.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Handlebars rendering error, e.g. a variable missing in strict mode.
    #[error("Failed to render {template}: {source}")]
    RenderError {
        template: &'static str,
        #[source]
        source: handlebars::RenderError,
    },
}
