//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading `repos.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    MissingFile { path: String },

    #[error("Failed to read '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The text is not valid TOML or does not match the expected shape.
    #[error("Failed to parse {origin}: {source}")]
    ParseError {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// A `[repos.<name>]` section holds an unusable value.
    #[error("Invalid repository pair '{pair}' in {origin}: {message}")]
    InvalidPair {
        origin: String,
        pair: String,
        message: String,
    },

    #[error("{origin} defines no [repos.<name>] sections")]
    NoPairs { origin: String },

    #[error("{origin}: sync.label must not be empty")]
    EmptyLabel { origin: String },
}
