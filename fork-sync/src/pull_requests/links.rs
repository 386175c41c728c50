//! Branch names, references and markdown links for migrated PRs.

use super::SyncError;
use crate::commits::CommitAuthor;
use crate::platform::GITHUB_URL;
use crate::summary::SyncResult;
use crate::types::{PrNumber, RepoId};
use bstr::ByteSlice;

/// Branch carrying the migration of source PR `number`.
///
/// # Errors
///
/// Returns [`SyncError::InvalidBranch`] if the name is not a valid reference.
pub fn branch_name(number: PrNumber) -> Result<String, SyncError> {
    let branch = format!("pr-{number}");
    gix_validate::reference::name_partial(branch.as_bytes().as_bstr()).map_err(|e| {
        SyncError::InvalidBranch {
            branch: branch.clone(),
            message: e.to_string(),
        }
    })?;
    Ok(branch)
}

/// Cross-repository reference, `owner/repo#N`.
#[must_use]
pub fn pr_ref(repo: &RepoId, number: PrNumber) -> String {
    format!("{repo}#{number}")
}

/// Markdown link to a pull request.
#[must_use]
pub fn pr_link(repo: &RepoId, number: PrNumber) -> String {
    format!("[{}]({GITHUB_URL}/{repo}/pull/{number})", pr_ref(repo, number))
}

/// Body of a migrated PR: the source body, a provenance footer and a co-author trailer.
#[must_use]
pub fn migration_body(
    source_body: Option<&str>,
    source_repo: &RepoId,
    source_pr: PrNumber,
    author: &CommitAuthor,
) -> String {
    let mut body = String::new();
    if let Some(original) = source_body.map(str::trim_end).filter(|b| !b.is_empty()) {
        body.push_str(original);
        body.push_str("\n\n");
    }
    body.push_str(&format!(
        "Migrated from {}\n\nCo-authored-by: {} <{}>\n",
        pr_ref(source_repo, source_pr),
        author.name,
        author.email
    ));
    body
}

/// One line of the summary notification.
///
/// `source-link [-> destination-link] author-login`. Commits without a source
/// PR link to the commit page instead.
#[must_use]
pub fn summary_entry(result: &SyncResult, community: &RepoId, enterprise: &RepoId) -> String {
    let mut entry = match result.source_pr {
        Some(number) => pr_link(community, number),
        None => format!("[{community}@{}]({})", result.source_sha, result.source_url),
    };
    if let Some(number) = result.resulting_pr {
        entry.push_str(" -> ");
        entry.push_str(&pr_link(enterprise, number));
    }
    entry.push(' ');
    entry.push_str(&result.author_login);
    entry
}
