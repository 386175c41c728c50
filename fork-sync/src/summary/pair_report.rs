//! Per-pair results.

use super::result::SyncResult;
use crate::types::RepoId;

/// What happened to one repository pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairReport {
    /// Section name from the configuration.
    pub name: String,

    pub community: RepoId,

    pub enterprise: RepoId,

    /// Commits found upstream but missing downstream.
    pub unmerged: usize,

    /// Migrations that merged, in processing order.
    pub successes: Vec<SyncResult>,

    /// Migrations that failed. Processing halts at the first one.
    pub failures: Vec<SyncResult>,

    /// Set when the pair could not be processed at all.
    pub error: Option<String>,
}

impl PairReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(name: impl Into<String>, community: RepoId, enterprise: RepoId) -> Self {
        Self {
            name: name.into(),
            community,
            enterprise,
            unmerged: 0,
            successes: Vec::new(),
            failures: Vec::new(),
            error: None,
        }
    }

    /// Files a migration result under successes or failures.
    pub fn record(&mut self, result: SyncResult) {
        if result.succeeded {
            self.successes.push(result);
        } else {
            self.failures.push(result);
        }
    }

    /// Number of migrations attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Whether the pair errored or any migration failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.error.is_some() || !self.failures.is_empty()
    }
}
