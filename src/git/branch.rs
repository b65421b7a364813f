use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::OnceLock;

use git2::Oid;
use tracing::debug;

use super::commit::CommitInfo;
use super::repository::Repository;
use super::walk::AncestryWalk;
use crate::config::LOCAL_PREFIX;
use crate::error::{Error, Result};

/// Point-in-time synchronization status of one branch ref.
///
/// All fields are computed once, at construction; the snapshot is never
/// updated afterwards. Equality is identity: two snapshots of the same ref in
/// the same repository compare equal even when their computed flags differ.
#[derive(Debug, Clone)]
pub struct BranchStatus {
    full_name: String,
    target: Oid,
    short_name: OnceLock<String>,
    remote_prefix: String,
    primary_branch: String,
    has_local_ref: bool,
    has_remote_ref: bool,
    has_tracked_ref: bool,
    is_remote_deleted: bool,
    is_current_branch: bool,
    has_unpushed_commits: bool,
    has_remote_commits: bool,
    is_merged: bool,
    latest_commit: CommitInfo,
    git_dir: PathBuf,
}

impl BranchStatus {
    /// Build a snapshot for `reference`, computing fields in dependency
    /// order: ref existence, tracking, divergence, deletion, checked-out
    /// state, then merge ancestry. Any repository read fault aborts the
    /// whole construction.
    pub(crate) fn of(
        repo: &Repository,
        reference: &git2::Reference<'_>,
        walk: &mut AncestryWalk,
    ) -> Result<Self> {
        let full_name = match reference.name() {
            Some(name) => name.to_string(),
            None => {
                return Err(Error::Ref(
                    String::from_utf8_lossy(reference.name_bytes()).into_owned(),
                ))
            }
        };

        let config = repo.config();
        let remote_prefix = config.remote_prefix();
        let short_name = strip_namespace(&full_name, &remote_prefix).to_string();
        let is_local = full_name.starts_with(LOCAL_PREFIX);
        let is_remote = full_name.starts_with(&remote_prefix);

        let has_local_ref = repo.ref_exists(&format!("{LOCAL_PREFIX}{short_name}"))?;
        let has_remote_ref = repo.ref_exists(&format!("{remote_prefix}{short_name}"))?;
        let has_tracked_ref = if is_remote {
            has_local_ref
        } else {
            has_remote_ref
        };

        let (has_unpushed_commits, has_remote_commits) = match repo.tracking_status(&short_name)? {
            Some((ahead, behind)) => (ahead > 0, behind > 0),
            None => (false, false),
        };

        // Deleted means: still configured to track, but the tracked ref is
        // gone. A branch that never tracked anything is not deleted.
        let is_remote_deleted =
            is_local && !has_remote_ref && repo.upstream_name(&short_name)?.is_some();

        let is_current_branch = repo.head_ref_name()?.as_deref() == Some(full_name.as_str());

        let commit = reference.peel_to_commit()?;
        let target = commit.id();
        let latest_commit = CommitInfo::from_commit(&commit);

        let is_merged = if short_name == config.primary_branch {
            true
        } else {
            merged_into_other_branch(repo, &full_name, target, walk)?
        };

        debug!(
            branch = %short_name,
            unpushed = has_unpushed_commits,
            behind = has_remote_commits,
            merged = is_merged,
            "computed branch status"
        );

        Ok(Self {
            full_name,
            target,
            short_name: OnceLock::new(),
            remote_prefix,
            primary_branch: config.primary_branch.clone(),
            has_local_ref,
            has_remote_ref,
            has_tracked_ref,
            is_remote_deleted,
            is_current_branch,
            has_unpushed_commits,
            has_remote_commits,
            is_merged,
            latest_commit,
            git_dir: repo.git_dir().to_path_buf(),
        })
    }

    /// Fully-qualified ref name, e.g. `refs/heads/foo`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Tip commit id the ref resolved to when the snapshot was taken.
    pub fn target(&self) -> Oid {
        self.target
    }

    /// Namespace-stripped branch name. Computed on first use, stable after.
    pub fn short_name(&self) -> &str {
        self.short_name
            .get_or_init(|| strip_namespace(&self.full_name, &self.remote_prefix).to_string())
    }

    pub fn is_local(&self) -> bool {
        self.full_name.starts_with(LOCAL_PREFIX)
    }

    pub fn is_remote(&self) -> bool {
        self.full_name.starts_with(&self.remote_prefix)
    }

    /// Whether a local ref of this branch name exists, tracked or not.
    pub fn has_local_ref(&self) -> bool {
        self.has_local_ref
    }

    /// Whether a remote ref of this branch name exists under the canonical
    /// remote, tracked or not.
    pub fn has_remote_ref(&self) -> bool {
        self.has_remote_ref
    }

    /// Whether the opposite-side counterpart ref exists.
    pub fn has_tracked_ref(&self) -> bool {
        self.has_tracked_ref
    }

    /// True for a local branch that is configured to track a remote branch
    /// whose ref no longer exists.
    pub fn is_remote_deleted(&self) -> bool {
        self.is_remote_deleted
    }

    /// Whether this ref is the repository's checked-out branch.
    pub fn is_current_branch(&self) -> bool {
        self.is_current_branch
    }

    /// Ahead of the tracked counterpart by at least one commit.
    pub fn has_unpushed_commits(&self) -> bool {
        self.has_unpushed_commits
    }

    /// Behind the tracked counterpart by at least one commit.
    pub fn has_remote_commits(&self) -> bool {
        self.has_remote_commits
    }

    /// True for the primary branch unconditionally; otherwise true when the
    /// tip is an ancestor of, or identical to, another local branch's tip.
    pub fn is_merged(&self) -> bool {
        self.is_merged
    }

    pub fn is_primary_branch(&self) -> bool {
        self.short_name() == self.primary_branch
    }

    /// Local-qualified name for this branch, e.g. `refs/heads/foo`.
    pub fn local_ref_name(&self) -> String {
        format!("{LOCAL_PREFIX}{}", self.short_name())
    }

    /// Remote-qualified name for this branch, e.g. `refs/remotes/origin/foo`.
    pub fn remote_ref_name(&self) -> String {
        format!("{}{}", self.remote_prefix, self.short_name())
    }

    pub fn latest_commit(&self) -> &CommitInfo {
        &self.latest_commit
    }
}

/// Test whether `tip` is reachable from any other local branch head,
/// stopping at the first witness.
fn merged_into_other_branch(
    repo: &Repository,
    full_name: &str,
    tip: Oid,
    walk: &mut AncestryWalk,
) -> Result<bool> {
    for (other_name, other_tip) in repo.local_branch_tips()? {
        if other_name == full_name {
            continue;
        }
        if walk.is_ancestor_of(repo.raw(), tip, other_tip)? {
            debug!(branch = full_name, into = %other_name, "tip reachable from another branch");
            return Ok(true);
        }
    }
    Ok(false)
}

fn strip_namespace<'a>(full_name: &'a str, remote_prefix: &str) -> &'a str {
    if let Some(short) = full_name.strip_prefix(LOCAL_PREFIX) {
        return short;
    }
    if let Some(short) = full_name.strip_prefix(remote_prefix) {
        return short;
    }
    // Outside both namespaces; the name is its own short name.
    full_name
}

/// Identity only: same repository, same full ref name. Computed flags are
/// deliberately excluded so a stale and a fresh snapshot of the same branch
/// compare equal.
impl PartialEq for BranchStatus {
    fn eq(&self, other: &Self) -> bool {
        self.git_dir == other.git_dir && self.full_name == other.full_name
    }
}

impl Eq for BranchStatus {}

impl Hash for BranchStatus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.git_dir.hash(state);
        self.full_name.hash(state);
    }
}
