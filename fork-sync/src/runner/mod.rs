//! Drives a sync run across every configured repository pair.
//!
//! Pairs are processed one after another. Within a pair, unmerged commits are
//! migrated oldest first and processing stops at the first failure so the
//! enterprise history never receives patches out of order.

mod config;
mod error;
mod workspace;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::commits::CommitRecord;
use crate::config::{load_config, RepoPairConfig, SyncConfig};
use crate::context::SyncContext;
use crate::history::{fetch_recent_commits, HistoryDiffer};
use crate::notify::{LogNotifier, Notification, Notifier, WebhookNotifier};
use crate::platform::GitHubHost;
use crate::pull_requests::{migrate_commit, summary_entry, MigrationTarget};
use crate::summary::{PairReport, RunSummary, SyncResult};
use crate::templates::{SummaryMessage, SUMMARY_TITLE};
use crate::vcs::{CommitIdentity, GitCli};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use workspace::Workspace;

/// Orchestrates a full sync run.
pub struct Runner {
    config: SyncConfig,
    ctx: SyncContext,
    dry_run: bool,
}

impl Runner {
    /// Loads the configuration and builds the GitHub-backed services.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the configuration cannot be loaded or a
    /// client cannot be created.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let sync_config = load_config(config.config_path())?;
        let settings = sync_config.settings.clone();

        let host = GitHubHost::new(config.token())?;
        let cloner = GitCli::new(
            config.token(),
            CommitIdentity::new(&settings.bot_name, &settings.bot_email),
        );
        let notifier: Arc<dyn Notifier> = match config.webhook_url() {
            Some(url) => Arc::new(WebhookNotifier::new(url)?),
            None => {
                info!("No webhook configured, notifications will be logged");
                Arc::new(LogNotifier)
            }
        };

        let ctx = SyncContext::new(Arc::new(host), Arc::new(cloner), notifier, settings);
        Ok(Self::with_context(sync_config, ctx, config.dry_run()))
    }

    /// Builds a runner over existing services.
    pub fn with_context(config: SyncConfig, ctx: SyncContext, dry_run: bool) -> Self {
        Self {
            config,
            ctx,
            dry_run,
        }
    }

    /// Syncs every pair in configuration order.
    ///
    /// Pair-level errors are logged and recorded in the summary; they never
    /// stop the run.
    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary::new(self.dry_run);
        info!(pairs = self.config.pairs.len(), dry_run = self.dry_run, "Starting sync");

        for pair in &self.config.pairs {
            summary.record_pair(self.sync_pair(pair).await);
        }

        summary
    }

    async fn sync_pair(&self, pair: &RepoPairConfig) -> PairReport {
        let span = info_span!(
            "sync_pair",
            name = %pair.name,
            community = %pair.community,
            enterprise = %pair.enterprise
        );

        async {
            let mut report =
                PairReport::new(&pair.name, pair.community.clone(), pair.enterprise.clone());
            if let Err(e) = self.try_sync_pair(pair, &mut report).await {
                error!(error = %e, "Failed to sync repository pair");
                report.error = Some(e.to_string());
            }
            report
        }
        .instrument(span)
        .await
    }

    async fn try_sync_pair(
        &self,
        pair: &RepoPairConfig,
        report: &mut PairReport,
    ) -> Result<(), RunnerError> {
        let host = self.ctx.host.as_ref();

        let community_history = fetch_recent_commits(host, &pair.community).await?;
        let enterprise_history = fetch_recent_commits(host, &pair.enterprise).await?;
        let mut unmerged = HistoryDiffer::new()
            .with_trusted_committer(self.ctx.settings.trusted_committer.clone())
            .find_unmerged(&community_history, &enterprise_history);
        unmerged.reverse();
        report.unmerged = unmerged.len();

        if self.dry_run {
            print_dry_run_preview(pair, &unmerged);
            return Ok(());
        }

        if unmerged.is_empty() {
            info!("Enterprise fork is up to date");
            return Ok(());
        }
        info!(count = unmerged.len(), "Found unmerged commits");

        let org_members: HashSet<String> = host
            .list_org_members(&pair.community.owner)
            .await?
            .into_iter()
            .collect();
        let base_branch = match &pair.default_branch {
            Some(branch) => branch.clone(),
            None => host.default_branch(&pair.enterprise).await?,
        };

        let workspace =
            Workspace::prepare(self.ctx.settings.work_dir.as_deref(), &pair.enterprise.name)
                .await?;
        let working_copy = self
            .ctx
            .cloner
            .clone_repository(&pair.enterprise, workspace.checkout())
            .await?;

        let target = MigrationTarget {
            community: &pair.community,
            enterprise: &pair.enterprise,
            base_branch: &base_branch,
            org_members: &org_members,
            working_copy: working_copy.as_ref(),
        };

        for (index, record) in unmerged.iter().enumerate() {
            info!(
                progress = %format!("{}/{}", index + 1, unmerged.len()),
                title = record.title().unwrap_or_default(),
                "Processing commit"
            );
            let result = migrate_commit(&self.ctx, &target, record).await;
            let failed = result.failed();
            report.record(result);
            if failed {
                warn!(
                    remaining = unmerged.len() - index - 1,
                    "Migration failed, halting this pair"
                );
                break;
            }
        }

        drop(working_copy);
        drop(workspace);

        if report.attempted() > 0 {
            self.notify(report).await?;
        }
        Ok(())
    }

    /// Sends the pair summary. Delivery failures are logged.
    async fn notify(&self, report: &PairReport) -> Result<(), RunnerError> {
        let entries = |results: &[SyncResult]| -> Vec<String> {
            results
                .iter()
                .map(|r| summary_entry(r, &report.community, &report.enterprise))
                .collect()
        };
        let succeeded = entries(report.successes.as_slice());
        let failed = entries(report.failures.as_slice());

        let markdown = self.ctx.renderer.render_summary(&SummaryMessage {
            succeeded: &succeeded,
            failed: &failed,
        })?;
        let notification = Notification {
            title: SUMMARY_TITLE.to_string(),
            markdown,
        };

        if let Err(e) = self.ctx.notifier.send(&notification).await {
            warn!(error = %e, "Failed to send notification");
        }
        Ok(())
    }
}

fn print_dry_run_preview(pair: &RepoPairConfig, unmerged: &[CommitRecord]) {
    println!(
        "\n[DRY RUN] {}: {} -> {}",
        pair.name, pair.community, pair.enterprise
    );
    println!("  Found {} unmerged commits:\n", unmerged.len());

    for (i, record) in unmerged.iter().enumerate() {
        let source = match record.pr_number() {
            Some(number) => format!("#{number}"),
            None => "no source PR".to_string(),
        };
        println!(
            "  [{}/{}] {} {} ({source})",
            i + 1,
            unmerged.len(),
            record.source().short_sha(),
            record.title().unwrap_or_default()
        );
    }

    println!();
}
