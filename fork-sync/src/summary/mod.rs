//! Run summary types and helpers.

mod pair_report;
mod result;
mod run_summary;

pub use pair_report::PairReport;
pub use result::SyncResult;
pub use run_summary::RunSummary;
