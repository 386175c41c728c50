//! Re-creating upstream commits as enterprise pull requests.
//!
//! Each unmerged commit becomes a branch named after its source PR. The
//! branch is opened as a PR, labelled, and squash-merged when the patch
//! applied cleanly and the host reports it mergeable. A conflicting patch
//! gets a comment with resolution steps and is left for a human.

mod error;
mod links;

pub use error::SyncError;
pub use links::{branch_name, migration_body, pr_link, pr_ref, summary_entry};

use crate::commits::CommitRecord;
use crate::context::SyncContext;
use crate::patch::{PatchApplier, PatchOutcome};
use crate::platform::NewPullRequest;
use crate::summary::SyncResult;
use crate::templates::ConflictComment;
use crate::types::{PrNumber, RepoId};
use crate::vcs::WorkingCopy;
use std::collections::HashSet;
use tracing::{error, info, info_span, warn, Instrument};

/// Where a commit is migrated to.
pub struct MigrationTarget<'a> {
    /// Repository the commit came from.
    pub community: &'a RepoId,

    /// Repository that receives the PR.
    pub enterprise: &'a RepoId,

    /// Branch the PR targets.
    pub base_branch: &'a str,

    /// Logins of the community organization, for mentions.
    pub org_members: &'a HashSet<String>,

    /// Checkout of the enterprise repository.
    pub working_copy: &'a dyn WorkingCopy,
}

/// Migrates one commit and reports the outcome.
///
/// Never fails: errors are logged and reported as a failure without a
/// resulting PR.
pub async fn migrate_commit(
    ctx: &SyncContext,
    target: &MigrationTarget<'_>,
    record: &CommitRecord,
) -> SyncResult {
    let span = info_span!(
        "migrate_commit",
        sha = %record.source().short_sha(),
        source_pr = ?record.pr_number().map(PrNumber::get)
    );

    async {
        match try_migrate(ctx, target, record).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Failed to migrate commit");
                sync_result(record, false, None, Some(e.to_string()))
            }
        }
    }
    .instrument(span)
    .await
}

async fn try_migrate(
    ctx: &SyncContext,
    target: &MigrationTarget<'_>,
    record: &CommitRecord,
) -> Result<SyncResult, SyncError> {
    let host = ctx.host.as_ref();
    let source_number = record
        .pr_number()
        .ok_or_else(|| SyncError::NoSourcePullRequest {
            sha: record.source().sha.clone(),
        })?;
    let source_pr = host.get_pull_request(target.community, source_number).await?;
    let title = record.title().unwrap_or_default();
    info!(title, "Migrating commit");

    let branch = branch_name(source_number)?;
    let outcome = PatchApplier::new(host, target.working_copy)
        .apply(target.community, record, &branch, target.base_branch)
        .await?;

    let body = migration_body(
        source_pr.body.as_deref(),
        target.community,
        source_number,
        &record.source().author,
    );
    let created = host
        .create_pull_request(
            target.enterprise,
            NewPullRequest {
                title,
                body: &body,
                head: &branch,
                base: target.base_branch,
            },
        )
        .await?;
    let number = created.number;
    info!(pr_number = %number, "Created pull request");

    // Mergeability is computed asynchronously by the host.
    tokio::time::sleep(ctx.settings.mergeability_delay()).await;
    let pr = host.get_pull_request(target.enterprise, number).await?;

    let labels = [ctx.settings.label.clone()];
    if let Err(e) = host.add_labels(target.enterprise, number, &labels).await {
        warn!(pr_number = %number, error = %e, "Failed to add label");
    }

    if let PatchOutcome::Fallback { conflict_files } = &outcome {
        post_conflict_comment(ctx, target, record, &branch, number, conflict_files).await?;
        return Ok(sync_result(
            record,
            false,
            Some(number),
            Some("patch conflicted, waiting for manual resolution".to_string()),
        ));
    }

    if pr.mergeable != Some(true) {
        warn!(pr_number = %number, mergeable = ?pr.mergeable, "Pull request is not mergeable");
        return Ok(sync_result(
            record,
            false,
            Some(number),
            Some("pull request is not mergeable".to_string()),
        ));
    }

    let merge = host
        .squash_merge(target.enterprise, number, &format!("{title} (#{number})"))
        .await?;
    if !merge.merged {
        warn!(pr_number = %number, message = ?merge.message, "Merge was rejected");
        return Ok(sync_result(
            record,
            false,
            Some(number),
            Some(merge.message.unwrap_or_else(|| "merge was rejected".to_string())),
        ));
    }

    info!(pr_number = %number, sha = ?merge.sha, "Merged pull request");
    Ok(sync_result(record, true, Some(number), None))
}

async fn post_conflict_comment(
    ctx: &SyncContext,
    target: &MigrationTarget<'_>,
    record: &CommitRecord,
    branch: &str,
    number: PrNumber,
    conflict_files: &[String],
) -> Result<(), SyncError> {
    let mention = record
        .source()
        .author
        .login
        .as_deref()
        .filter(|login| target.org_members.contains(*login))
        .unwrap_or_default();

    let comment = ctx.renderer.render_conflict_comment(&ConflictComment {
        mention,
        enterprise_repo: target.enterprise.full_name(),
        enterprise_name: &target.enterprise.name,
        branch,
        base_branch: target.base_branch,
        patch_url: record.source().patch_url(),
        conflict_files,
    })?;

    ctx.host
        .create_comment(target.enterprise, number, &comment)
        .await?;
    info!(pr_number = %number, mention, "Posted conflict resolution comment");
    Ok(())
}

fn sync_result(
    record: &CommitRecord,
    succeeded: bool,
    resulting_pr: Option<PrNumber>,
    reason: Option<String>,
) -> SyncResult {
    SyncResult {
        succeeded,
        resulting_pr,
        source_pr: record.pr_number(),
        source_sha: record.source().short_sha().to_string(),
        source_url: record.source().html_url.clone(),
        author_login: record.author_login().to_string(),
        reason,
    }
}
