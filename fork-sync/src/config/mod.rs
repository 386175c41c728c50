//! Repository pair configuration.
//!
//! The configuration is a TOML file with an optional `[sync]` table and one
//! `[repos.<name>]` section per pair. Sections are processed in file order.
//!
//! ```toml
//! [sync]
//! label = "auto-sync"
//!
//! [repos.nebula]
//! community-repo = "vesoft-inc/nebula"
//! enterprise-repo = "vesoft-inc/nebula-ent"
//! ```

mod error;
mod repo_pair;
mod settings;

pub use error::ConfigError;
pub use repo_pair::RepoPairConfig;
pub use settings::SyncSettings;

use crate::types::RepoId;
use bstr::ByteSlice;
use repo_pair::RawRepoPair;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// A fully validated configuration file.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Run-wide settings.
    pub settings: SyncSettings,

    /// Repository pairs in file order.
    pub pairs: Vec<RepoPairConfig>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    sync: SyncSettings,
    #[serde(default)]
    repos: toml::Table,
}

/// Loads and validates a configuration file.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is missing, unreadable, malformed or
/// fails validation.
pub fn load_config(path: &Path) -> Result<SyncConfig, ConfigError> {
    info!(path = %path.display(), "Loading configuration");

    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let config = parse_config(&content, &path.display().to_string())?;
    info!(pairs = config.pairs.len(), "Loaded configuration");
    Ok(config)
}

/// Parses configuration text. `origin` names the source in error messages.
///
/// # Errors
///
/// Returns [`ConfigError`] if the text is malformed or fails validation.
pub fn parse_config(content: &str, origin: &str) -> Result<SyncConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::ParseError {
        origin: origin.to_string(),
        source: e,
    })?;

    let mut pairs = Vec::with_capacity(raw.repos.len());
    for (name, section) in raw.repos {
        let section: RawRepoPair = section.try_into().map_err(|e| ConfigError::ParseError {
            origin: format!("{origin} [repos.{name}]"),
            source: e,
        })?;
        let pair = validate_pair(name, section, origin)?;
        debug!(
            name = %pair.name,
            community = %pair.community,
            enterprise = %pair.enterprise,
            "Loaded repository pair"
        );
        pairs.push(pair);
    }

    if pairs.is_empty() {
        return Err(ConfigError::NoPairs {
            origin: origin.to_string(),
        });
    }

    if raw.sync.label.trim().is_empty() {
        return Err(ConfigError::EmptyLabel {
            origin: origin.to_string(),
        });
    }

    Ok(SyncConfig {
        settings: raw.sync,
        pairs,
    })
}

fn validate_pair(
    name: String,
    section: RawRepoPair,
    origin: &str,
) -> Result<RepoPairConfig, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidPair {
        origin: origin.to_string(),
        pair: name.clone(),
        message,
    };

    let community = RepoId::parse(&section.community_repo).ok_or_else(|| {
        invalid(format!(
            "community-repo must be 'owner/name', got '{}'",
            section.community_repo
        ))
    })?;
    let enterprise = RepoId::parse(&section.enterprise_repo).ok_or_else(|| {
        invalid(format!(
            "enterprise-repo must be 'owner/name', got '{}'",
            section.enterprise_repo
        ))
    })?;

    if let Some(branch) = &section.default_branch {
        gix_validate::reference::name_partial(branch.as_bytes().as_bstr())
            .map_err(|e| invalid(format!("default-branch '{branch}' is not valid: {e}")))?;
    }

    Ok(RepoPairConfig {
        name,
        community,
        enterprise,
        default_branch: section.default_branch,
    })
}
