//! Runner error types.

/// Errors that can occur while setting up or driving a sync run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Code host errors.
    #[error(transparent)]
    Platform(#[from] crate::platform::PlatformError),

    /// Cloning errors.
    #[error(transparent)]
    Vcs(#[from] crate::vcs::VcsError),

    /// Notifier setup errors.
    #[error(transparent)]
    Notify(#[from] crate::notify::NotifyError),

    /// Summary rendering errors.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// Working directory errors.
    #[error("Failed to prepare working directory '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
