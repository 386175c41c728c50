//! Mock services for driving the sync pipeline without GitHub or git.
//!
//! Not every helper is used by every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use fork_sync::commits::{ChangedFile, CommitAuthor, SourceCommit};
use fork_sync::config::{RepoPairConfig, SyncConfig, SyncSettings};
use fork_sync::notify::{Notification, Notifier, NotifyError};
use fork_sync::platform::{CodeHost, MergeOutcome, NewPullRequest, PlatformError, PullRequest};
use fork_sync::vcs::{ApplyOutcome, Cloner, CommitIdentity, VcsError, WorkingCopy};
use fork_sync::{PrNumber, RepoId, Runner, SyncContext};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Patches starting with this marker make [`MockWorkingCopy`] report a conflict.
pub const CONFLICT_MARKER: &str = "CONFLICT";

/// File reported as conflicting by [`MockWorkingCopy`].
pub const CONFLICT_FILE: &str = "src/lib.rs";

pub fn community() -> RepoId {
    RepoId::new("acme", "widgets")
}

pub fn enterprise() -> RepoId {
    RepoId::new("acme", "widgets-ent")
}

/// Builds a commit authored by `login`.
pub fn commit(sha: &str, message: &str, login: &str) -> SourceCommit {
    SourceCommit {
        sha: sha.to_string(),
        message: message.to_string(),
        author: CommitAuthor {
            name: format!("{login} name"),
            email: format!("{login}@example.com"),
            login: Some(login.to_string()),
        },
        html_url: format!("https://github.com/acme/widgets/commit/{sha}"),
    }
}

/// Call record for `create_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub repo: RepoId,
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

/// Call record for `create_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentCall {
    pub number: PrNumber,
    pub body: String,
}

/// Call record for `squash_merge`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub number: PrNumber,
    pub title: String,
}

/// In-memory code host.
///
/// - Histories, patches and changed files are configured per repository or sha
/// - Created PRs are numbered from 100 and mergeable unless their head is marked
/// - Calls are recorded for verification
/// - Errors can be injected per operation
pub struct MockHost {
    next_pr_number: AtomicU64,
    members: Mutex<Vec<String>>,
    histories: Mutex<HashMap<RepoId, Vec<SourceCommit>>>,
    source_bodies: Mutex<HashMap<PrNumber, String>>,
    patches: Mutex<HashMap<String, Vec<u8>>>,
    files: Mutex<HashMap<String, Vec<ChangedFile>>>,
    raw_files: Mutex<HashMap<String, Vec<u8>>>,
    created: Mutex<HashMap<PrNumber, String>>,
    unmergeable_heads: Mutex<HashSet<String>>,
    rejected_heads: Mutex<HashSet<String>>,
    // Call tracking
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    label_calls: Mutex<Vec<(PrNumber, Vec<String>)>>,
    comment_calls: Mutex<Vec<CommentCall>>,
    merge_calls: Mutex<Vec<MergeCall>>,
    // Error injection
    error_on_history: Mutex<HashSet<RepoId>>,
    error_on_labels: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            next_pr_number: AtomicU64::new(100),
            members: Mutex::new(Vec::new()),
            histories: Mutex::new(HashMap::new()),
            source_bodies: Mutex::new(HashMap::new()),
            patches: Mutex::new(HashMap::new()),
            files: Mutex::new(HashMap::new()),
            raw_files: Mutex::new(HashMap::new()),
            created: Mutex::new(HashMap::new()),
            unmergeable_heads: Mutex::new(HashSet::new()),
            rejected_heads: Mutex::new(HashSet::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            label_calls: Mutex::new(Vec::new()),
            comment_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            error_on_history: Mutex::new(HashSet::new()),
            error_on_labels: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
        }
    }

    // === Setup ===

    pub fn set_members(&self, members: &[&str]) {
        *self.members.lock().unwrap() = members.iter().map(ToString::to_string).collect();
    }

    /// Sets a history, newest first.
    pub fn set_history(&self, repo: &RepoId, commits: Vec<SourceCommit>) {
        self.histories.lock().unwrap().insert(repo.clone(), commits);
    }

    pub fn set_source_body(&self, number: u64, body: &str) {
        self.source_bodies
            .lock()
            .unwrap()
            .insert(PrNumber(number), body.to_string());
    }

    pub fn set_patch(&self, sha: &str, patch: &str) {
        self.set_patch_bytes(sha, patch.as_bytes());
    }

    pub fn set_patch_bytes(&self, sha: &str, patch: &[u8]) {
        self.patches
            .lock()
            .unwrap()
            .insert(sha.to_string(), patch.to_vec());
    }

    pub fn set_files(&self, sha: &str, files: Vec<ChangedFile>) {
        self.files.lock().unwrap().insert(sha.to_string(), files);
    }

    pub fn set_raw_file(&self, url: &str, content: &str) {
        self.raw_files
            .lock()
            .unwrap()
            .insert(url.to_string(), content.as_bytes().to_vec());
    }

    /// PRs opened from `head` report `mergeable: false`.
    pub fn mark_unmergeable(&self, head: &str) {
        self.unmergeable_heads.lock().unwrap().insert(head.to_string());
    }

    /// Merging PRs opened from `head` reports not merged.
    pub fn reject_merge(&self, head: &str) {
        self.rejected_heads.lock().unwrap().insert(head.to_string());
    }

    // === Error injection ===

    pub fn fail_history(&self, repo: &RepoId) {
        self.error_on_history.lock().unwrap().insert(repo.clone());
    }

    pub fn fail_labels(&self, msg: &str) {
        *self.error_on_labels.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Call inspection ===

    pub fn create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn created_heads(&self) -> Vec<String> {
        self.create_pr_calls()
            .into_iter()
            .map(|call| call.head)
            .collect()
    }

    pub fn label_calls(&self) -> Vec<(PrNumber, Vec<String>)> {
        self.label_calls.lock().unwrap().clone()
    }

    pub fn comment_calls(&self) -> Vec<CommentCall> {
        self.comment_calls.lock().unwrap().clone()
    }

    pub fn merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    fn head_of(&self, number: PrNumber) -> Option<String> {
        self.created.lock().unwrap().get(&number).cloned()
    }
}

fn injected(message: String) -> PlatformError {
    PlatformError::UnexpectedResponse { message }
}

#[async_trait]
impl CodeHost for MockHost {
    async fn list_org_members(&self, _org: &str) -> Result<Vec<String>, PlatformError> {
        Ok(self.members.lock().unwrap().clone())
    }

    async fn default_branch(&self, _repo: &RepoId) -> Result<String, PlatformError> {
        Ok("master".to_string())
    }

    async fn list_recent_commits(
        &self,
        repo: &RepoId,
        limit: usize,
    ) -> Result<Vec<SourceCommit>, PlatformError> {
        if self.error_on_history.lock().unwrap().contains(repo) {
            return Err(injected(format!("history of {repo} unavailable")));
        }
        let history = self.histories.lock().unwrap();
        Ok(history
            .get(repo)
            .map(|commits| commits.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn list_commit_files(
        &self,
        _repo: &RepoId,
        sha: &str,
    ) -> Result<Vec<ChangedFile>, PlatformError> {
        Ok(self.files.lock().unwrap().get(sha).cloned().unwrap_or_default())
    }

    async fn fetch_patch(&self, commit: &SourceCommit) -> Result<Vec<u8>, PlatformError> {
        Ok(self
            .patches
            .lock()
            .unwrap()
            .get(&commit.sha)
            .cloned()
            .unwrap_or_else(|| {
                format!("From {} Mon Sep 17 00:00:00 2001\n", commit.sha).into_bytes()
            }))
    }

    async fn fetch_raw_file(&self, raw_url: &str) -> Result<Vec<u8>, PlatformError> {
        self.raw_files
            .lock()
            .unwrap()
            .get(raw_url)
            .cloned()
            .ok_or_else(|| injected(format!("no content at {raw_url}")))
    }

    async fn get_pull_request(
        &self,
        repo: &RepoId,
        number: PrNumber,
    ) -> Result<PullRequest, PlatformError> {
        if let Some(head) = self.head_of(number).filter(|_| *repo == enterprise()) {
            let mergeable = !self.unmergeable_heads.lock().unwrap().contains(&head);
            return Ok(PullRequest {
                number,
                title: head,
                body: None,
                mergeable: Some(mergeable),
            });
        }
        Ok(PullRequest {
            number,
            title: format!("Source PR {number}"),
            body: self.source_bodies.lock().unwrap().get(&number).cloned(),
            mergeable: None,
        })
    }

    async fn create_pull_request(
        &self,
        repo: &RepoId,
        pull_request: NewPullRequest<'_>,
    ) -> Result<PullRequest, PlatformError> {
        if let Some(msg) = self.error_on_create_pr.lock().unwrap().clone() {
            return Err(injected(msg));
        }
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            repo: repo.clone(),
            title: pull_request.title.to_string(),
            body: pull_request.body.to_string(),
            head: pull_request.head.to_string(),
            base: pull_request.base.to_string(),
        });

        let number = PrNumber(self.next_pr_number.fetch_add(1, Ordering::SeqCst));
        self.created
            .lock()
            .unwrap()
            .insert(number, pull_request.head.to_string());
        Ok(PullRequest {
            number,
            title: pull_request.title.to_string(),
            body: Some(pull_request.body.to_string()),
            // Not computed yet, like a freshly opened PR.
            mergeable: None,
        })
    }

    async fn add_labels(
        &self,
        _repo: &RepoId,
        number: PrNumber,
        labels: &[String],
    ) -> Result<(), PlatformError> {
        if let Some(msg) = self.error_on_labels.lock().unwrap().clone() {
            return Err(injected(msg));
        }
        self.label_calls
            .lock()
            .unwrap()
            .push((number, labels.to_vec()));
        Ok(())
    }

    async fn create_comment(
        &self,
        _repo: &RepoId,
        number: PrNumber,
        body: &str,
    ) -> Result<(), PlatformError> {
        self.comment_calls.lock().unwrap().push(CommentCall {
            number,
            body: body.to_string(),
        });
        Ok(())
    }

    async fn squash_merge(
        &self,
        _repo: &RepoId,
        number: PrNumber,
        commit_title: &str,
    ) -> Result<MergeOutcome, PlatformError> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            number,
            title: commit_title.to_string(),
        });
        let rejected = self
            .head_of(number)
            .is_some_and(|head| self.rejected_heads.lock().unwrap().contains(&head));
        Ok(MergeOutcome {
            merged: !rejected,
            sha: (!rejected).then(|| format!("merge-{number}")),
            message: Some(if rejected {
                "Base branch was modified".to_string()
            } else {
                "Pull Request successfully merged".to_string()
            }),
        })
    }
}

/// Working copy that records operations instead of running git.
pub struct MockWorkingCopy {
    root: PathBuf,
    log: Arc<Mutex<Vec<String>>>,
    staged: Arc<Mutex<HashMap<String, String>>>,
    applied: Arc<Mutex<Vec<Vec<u8>>>>,
}

/// Every file under `root` keyed by its `/`-separated relative path.
fn snapshot(root: &Path) -> HashMap<String, String> {
    fn walk(root: &Path, dir: &Path, files: &mut HashMap<String, String>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(root, &path, files);
            } else if let Ok(content) = std::fs::read_to_string(&path) {
                let relative = path.strip_prefix(root).unwrap();
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                files.insert(key, content);
            }
        }
    }

    let mut files = HashMap::new();
    walk(root, root, &mut files);
    files
}

impl MockWorkingCopy {
    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl WorkingCopy for MockWorkingCopy {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn fetch(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.record(format!("fetch {remote} {branch}"));
        Ok(())
    }

    async fn checkout_new_branch(
        &self,
        branch: &str,
        start_point: &str,
    ) -> Result<(), VcsError> {
        self.record(format!("checkout {branch} {start_point}"));
        Ok(())
    }

    async fn apply_mailbox(&self, patch: &Path) -> Result<ApplyOutcome, VcsError> {
        let content = std::fs::read(patch).map_err(|source| VcsError::IoError {
            path: patch.display().to_string(),
            source,
        })?;
        self.record("am".to_string());
        let conflicted = content.starts_with(CONFLICT_MARKER.as_bytes());
        self.applied.lock().unwrap().push(content);
        if conflicted {
            Ok(ApplyOutcome::Conflict {
                conflict_files: vec![CONFLICT_FILE.to_string()],
            })
        } else {
            Ok(ApplyOutcome::Applied)
        }
    }

    async fn abort_apply(&self) -> Result<(), VcsError> {
        self.record("am --abort".to_string());
        Ok(())
    }

    async fn remove_path(&self, path: &str) -> Result<(), VcsError> {
        self.record(format!("rm {path}"));
        let _ = std::fs::remove_file(self.root.join(path));
        Ok(())
    }

    async fn stage_all(&self) -> Result<(), VcsError> {
        self.record("add -A".to_string());
        *self.staged.lock().unwrap() = snapshot(&self.root);
        Ok(())
    }

    async fn commit_as(&self, message: &str, author: &CommitIdentity) -> Result<(), VcsError> {
        self.record(format!("commit {message} by {}", author.to_author_string()));
        Ok(())
    }

    async fn push_upstream(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.record(format!("push {remote} {branch}"));
        Ok(())
    }
}

/// Cloner that creates a directory holding the seeded files and a
/// [`MockWorkingCopy`] over it.
#[derive(Default)]
pub struct MockCloner {
    clones: Mutex<Vec<RepoId>>,
    seeded: Mutex<Vec<(String, String)>>,
    log: Arc<Mutex<Vec<String>>>,
    staged: Arc<Mutex<HashMap<String, String>>>,
    applied: Arc<Mutex<Vec<Vec<u8>>>>,
    last_root: Mutex<Option<PathBuf>>,
}

impl MockCloner {
    /// Writes `content` at `path` in every checkout handed out.
    pub fn seed_file(&self, path: &str, content: &str) {
        self.seeded
            .lock()
            .unwrap()
            .push((path.to_string(), content.to_string()));
    }

    /// Bytes of every patch file handed to `git am`, in order.
    pub fn applied_patches(&self) -> Vec<Vec<u8>> {
        self.applied.lock().unwrap().clone()
    }

    /// Paths present when the working copy was last staged.
    pub fn staged_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.staged.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn clones(&self) -> Vec<RepoId> {
        self.clones.lock().unwrap().clone()
    }

    /// Operations performed on every working copy handed out, in order.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Content of `path` when the working copy was last staged.
    pub fn staged(&self, path: &str) -> Option<String> {
        self.staged.lock().unwrap().get(path).cloned()
    }

    pub fn last_root(&self) -> Option<PathBuf> {
        self.last_root.lock().unwrap().clone()
    }
}

#[async_trait]
impl Cloner for MockCloner {
    async fn clone_repository(
        &self,
        repo: &RepoId,
        dest: &Path,
    ) -> Result<Box<dyn WorkingCopy>, VcsError> {
        std::fs::create_dir_all(dest).map_err(|source| VcsError::IoError {
            path: dest.display().to_string(),
            source,
        })?;
        for (path, content) in self.seeded.lock().unwrap().iter() {
            let local = dest.join(path);
            if let Some(parent) = local.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(local, content).unwrap();
        }
        self.clones.lock().unwrap().push(repo.clone());
        *self.last_root.lock().unwrap() = Some(dest.to_path_buf());
        Ok(Box::new(MockWorkingCopy {
            root: dest.to_path_buf(),
            log: Arc::clone(&self.log),
            staged: Arc::clone(&self.staged),
            applied: Arc::clone(&self.applied),
        }))
    }
}

/// Notifier that keeps every message.
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MockNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// A runner wired to mocks, with handles for inspection.
pub struct Harness {
    pub host: Arc<MockHost>,
    pub cloner: Arc<MockCloner>,
    pub notifier: Arc<MockNotifier>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self {
            host: Arc::new(MockHost::new()),
            cloner: Arc::new(MockCloner::default()),
            notifier: Arc::new(MockNotifier::default()),
        }
    }

    /// Settings with no mergeability delay.
    pub fn settings() -> SyncSettings {
        SyncSettings {
            mergeability_delay_secs: 0,
            ..SyncSettings::default()
        }
    }

    pub fn pair() -> RepoPairConfig {
        RepoPairConfig {
            name: "widgets".to_string(),
            community: community(),
            enterprise: enterprise(),
            default_branch: None,
        }
    }

    pub fn runner(&self, pairs: Vec<RepoPairConfig>, settings: SyncSettings, dry_run: bool) -> Runner {
        let ctx = SyncContext::new(
            self.host.clone(),
            self.cloner.clone(),
            self.notifier.clone(),
            settings.clone(),
        );
        Runner::with_context(SyncConfig { settings, pairs }, ctx, dry_run)
    }
}
