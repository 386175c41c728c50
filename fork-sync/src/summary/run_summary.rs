//! Run summary types.

use super::pair_report::PairReport;

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// One report per configured pair, in configuration order.
    pub pairs: Vec<PairReport>,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Adds a pair report.
    pub fn record_pair(&mut self, report: PairReport) {
        self.pairs.push(report);
    }

    /// Total commits found unmerged across all pairs.
    #[must_use]
    pub fn unmerged(&self) -> usize {
        self.pairs.iter().map(|p| p.unmerged).sum()
    }

    /// Total migrations that merged.
    #[must_use]
    pub fn merged(&self) -> usize {
        self.pairs.iter().map(|p| p.successes.len()).sum()
    }

    /// Total migrations that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.pairs.iter().map(|p| p.failures.len()).sum()
    }

    /// Pairs that could not be processed.
    #[must_use]
    pub fn pair_errors(&self) -> usize {
        self.pairs.iter().filter(|p| p.error.is_some()).count()
    }

    /// Returns true if any failures occurred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.pairs.iter().any(PairReport::has_failures)
    }

    /// Returns true if all operations were successful.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }
}
