//! GitHub implementation of [`CodeHost`].

use super::{CodeHost, MergeOutcome, NewPullRequest, PlatformError, PullRequest};
use crate::commits::{ChangedFile, CommitAuthor, SourceCommit};
use crate::rate_limit::ensure_core_rate_limit;
use crate::types::{PrNumber, RepoId};
use async_trait::async_trait;
use octocrab::params::pulls::MergeMethod;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest page size accepted by the REST API.
const PER_PAGE: u8 = 100;

const USER_AGENT: &str = concat!("fork-sync/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

// Wire types for the commits endpoints. Only the fields we read are declared.

#[derive(Deserialize)]
struct CommitItem {
    sha: String,
    html_url: String,
    commit: GitCommit,
    author: Option<Account>,
}

#[derive(Deserialize)]
struct GitCommit {
    message: String,
    author: Option<GitSignature>,
}

#[derive(Deserialize)]
struct GitSignature {
    name: Option<String>,
    email: Option<String>,
}

#[derive(Deserialize)]
struct Account {
    login: String,
}

#[derive(Deserialize)]
struct CommitDetail {
    #[serde(default)]
    files: Vec<ChangedFile>,
}

impl From<CommitItem> for SourceCommit {
    fn from(item: CommitItem) -> Self {
        let (name, email) = item
            .commit
            .author
            .map(|a| (a.name.unwrap_or_default(), a.email.unwrap_or_default()))
            .unwrap_or_default();
        Self {
            sha: item.sha,
            message: item.commit.message,
            author: CommitAuthor {
                name,
                email,
                login: item.author.map(|a| a.login),
            },
            html_url: item.html_url,
        }
    }
}

fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: PrNumber(pr.number),
        title: pr.title.clone().unwrap_or_default(),
        body: pr.body.clone(),
        mergeable: pr.mergeable,
    }
}

/// GitHub service using octocrab for the REST API and reqwest for raw downloads.
pub struct GitHubHost {
    client: Octocrab,
    http: reqwest::Client,
    token: String,
}

impl GitHubHost {
    /// Creates an authenticated GitHub host.
    pub fn new(token: &str) -> Result<Self, PlatformError> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(PlatformError::ClientError)?;
        Ok(Self {
            client,
            http,
            token: token.to_string(),
        })
    }

    /// Issues an authenticated GET and fails on non-success status.
    async fn download(&self, url: &str) -> Result<reqwest::Response, PlatformError> {
        let to_error = |source| PlatformError::HttpError {
            url: url.to_string(),
            source,
        };
        self.http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(to_error)?
            .error_for_status()
            .map_err(to_error)
    }
}

#[async_trait]
impl CodeHost for GitHubHost {
    async fn list_org_members(&self, org: &str) -> Result<Vec<String>, PlatformError> {
        debug!(org, "Listing organization members");
        ensure_core_rate_limit(&self.client).await?;
        let first = self
            .client
            .orgs(org)
            .list_members()
            .per_page(PER_PAGE)
            .send()
            .await?;
        let members = self.client.all_pages(first).await?;
        Ok(members.into_iter().map(|m| m.login).collect())
    }

    async fn default_branch(&self, repo: &RepoId) -> Result<String, PlatformError> {
        ensure_core_rate_limit(&self.client).await?;
        let info = self.client.repos(&repo.owner, &repo.name).get().await?;
        info.default_branch
            .ok_or_else(|| PlatformError::UnexpectedResponse {
                message: format!("{repo} has no default branch"),
            })
    }

    async fn list_recent_commits(
        &self,
        repo: &RepoId,
        limit: usize,
    ) -> Result<Vec<SourceCommit>, PlatformError> {
        debug!(repo = %repo, limit, "Listing recent commits");
        let route = format!("/repos/{}/{}/commits", repo.owner, repo.name);
        let mut commits = Vec::with_capacity(limit);
        let mut page = 1;

        while commits.len() < limit {
            ensure_core_rate_limit(&self.client).await?;
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };
            let items: Vec<CommitItem> = self.client.get(&route, Some(&params)).await?;
            let exhausted = items.len() < usize::from(PER_PAGE);
            commits.extend(items.into_iter().map(SourceCommit::from));
            if exhausted {
                break;
            }
            page += 1;
        }

        commits.truncate(limit);
        Ok(commits)
    }

    async fn list_commit_files(
        &self,
        repo: &RepoId,
        sha: &str,
    ) -> Result<Vec<ChangedFile>, PlatformError> {
        let route = format!("/repos/{}/{}/commits/{}", repo.owner, repo.name, sha);
        let mut files = Vec::new();
        let mut page = 1;

        loop {
            ensure_core_rate_limit(&self.client).await?;
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };
            let detail: CommitDetail = self.client.get(&route, Some(&params)).await?;
            let exhausted = detail.files.len() < usize::from(PER_PAGE);
            files.extend(detail.files);
            if exhausted {
                break;
            }
            page += 1;
        }

        debug!(sha, count = files.len(), "Listed commit files");
        Ok(files)
    }

    async fn fetch_patch(&self, commit: &SourceCommit) -> Result<Vec<u8>, PlatformError> {
        let url = commit.patch_url();
        debug!(url = %url, "Fetching patch");
        // Patches may carry non-UTF-8 file content; never decode them.
        let bytes = self
            .download(&url)
            .await?
            .bytes()
            .await
            .map_err(|source| PlatformError::HttpError { url, source })?;
        Ok(bytes.to_vec())
    }

    async fn fetch_raw_file(&self, raw_url: &str) -> Result<Vec<u8>, PlatformError> {
        let bytes = self
            .download(raw_url)
            .await?
            .bytes()
            .await
            .map_err(|source| PlatformError::HttpError {
                url: raw_url.to_string(),
                source,
            })?;
        Ok(bytes.to_vec())
    }

    async fn get_pull_request(
        &self,
        repo: &RepoId,
        number: PrNumber,
    ) -> Result<PullRequest, PlatformError> {
        ensure_core_rate_limit(&self.client).await?;
        let pr = self
            .client
            .pulls(&repo.owner, &repo.name)
            .get(number.get())
            .await?;
        Ok(pr_from_octocrab(&pr))
    }

    async fn create_pull_request(
        &self,
        repo: &RepoId,
        pull_request: NewPullRequest<'_>,
    ) -> Result<PullRequest, PlatformError> {
        debug!(head = pull_request.head, base = pull_request.base, "Creating PR");
        ensure_core_rate_limit(&self.client).await?;
        let pr = self
            .client
            .pulls(&repo.owner, &repo.name)
            .create(pull_request.title, pull_request.head, pull_request.base)
            .body(pull_request.body)
            .send()
            .await?;
        Ok(pr_from_octocrab(&pr))
    }

    async fn add_labels(
        &self,
        repo: &RepoId,
        number: PrNumber,
        labels: &[String],
    ) -> Result<(), PlatformError> {
        ensure_core_rate_limit(&self.client).await?;
        self.client
            .issues(&repo.owner, &repo.name)
            .add_labels(number.get(), labels)
            .await?;
        Ok(())
    }

    async fn create_comment(
        &self,
        repo: &RepoId,
        number: PrNumber,
        body: &str,
    ) -> Result<(), PlatformError> {
        ensure_core_rate_limit(&self.client).await?;
        self.client
            .issues(&repo.owner, &repo.name)
            .create_comment(number.get(), body)
            .await?;
        Ok(())
    }

    async fn squash_merge(
        &self,
        repo: &RepoId,
        number: PrNumber,
        commit_title: &str,
    ) -> Result<MergeOutcome, PlatformError> {
        debug!(pr_number = %number, "Squash-merging PR");
        ensure_core_rate_limit(&self.client).await?;
        let merge = self
            .client
            .pulls(&repo.owner, &repo.name)
            .merge(number.get())
            .method(MergeMethod::Squash)
            .title(commit_title)
            .send()
            .await?;
        Ok(MergeOutcome {
            merged: merge.merged,
            sha: merge.sha,
            message: merge.message,
        })
    }
}
