//! Loading configuration files from disk.

use fork_sync::config::{load_config, ConfigError};
use fork_sync::RepoId;
use std::path::PathBuf;
use std::time::Duration;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn loads_pairs_in_file_order() {
    let config = load_config(&fixture("repos.toml")).unwrap();

    let names: Vec<_> = config.pairs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["nebula", "nebula-console", "nebula-common"]);
    assert_eq!(
        config.pairs[2].community,
        RepoId::new("vesoft-inc", "nebula-common")
    );
    assert_eq!(config.pairs[1].default_branch.as_deref(), Some("master"));
}

#[test]
fn loads_sync_settings() {
    let config = load_config(&fixture("repos.toml")).unwrap();
    let settings = &config.settings;

    assert_eq!(settings.bot_name, "nebula-bot");
    assert_eq!(settings.bot_email, "nebula-bot@vesoft.com");
    assert_eq!(settings.mergeability_delay(), Duration::from_secs(5));
    assert_eq!(settings.trusted_committer.as_deref(), Some("nebula-bot"));
    assert_eq!(settings.work_dir, None);
}

#[test]
fn rejects_unknown_keys() {
    let result = load_config(&fixture("unknown-key.toml"));
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn rejects_file_without_pairs() {
    let result = load_config(&fixture("no-pairs.toml"));
    assert!(matches!(result, Err(ConfigError::NoPairs { .. })));
}
