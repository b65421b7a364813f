use std::path::{Path, PathBuf};

use git2::{ErrorCode, Oid, Repository as Git2Repository};
use tracing::debug;

use super::branch::BranchStatus;
use super::walk::AncestryWalk;
use crate::config::{StatusConfig, LOCAL_PREFIX};
use crate::error::Result;

/// Read-only handle to a git repository, scoped to status computation.
pub struct Repository {
    repo: Git2Repository,
    git_dir: PathBuf,
    config: StatusConfig,
}

impl Repository {
    /// Open the repository containing the current directory.
    pub fn discover() -> Result<Self> {
        Self::from_raw(Git2Repository::discover(".")?, StatusConfig::default())
    }

    /// Open the repository at `path` with default namespace conventions.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, StatusConfig::default())
    }

    /// Open the repository at `path` with explicit namespace conventions.
    pub fn open_with<P: AsRef<Path>>(path: P, config: StatusConfig) -> Result<Self> {
        Self::from_raw(Git2Repository::open(path.as_ref())?, config)
    }

    fn from_raw(repo: Git2Repository, config: StatusConfig) -> Result<Self> {
        let git_dir = repo.path().to_path_buf();
        Ok(Self {
            repo,
            git_dir,
            config,
        })
    }

    /// The repository's git directory. Identifies the repository for
    /// snapshot equality.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    pub(crate) fn raw(&self) -> &Git2Repository {
        &self.repo
    }

    /// Compute the status snapshot for one ref, given by full name.
    /// The ref itself must exist; counterpart refs need not.
    pub fn branch_status(&self, full_name: &str) -> Result<BranchStatus> {
        let reference = self.repo.find_reference(full_name)?;
        let mut walk = AncestryWalk::new();
        BranchStatus::of(self, &reference, &mut walk)
    }

    /// Compute status snapshots for every local branch, and optionally every
    /// remote branch under the canonical remote. All snapshots share one
    /// walk context so ancestry checks reuse parsed commits.
    pub fn branch_statuses(&self, include_remote: bool) -> Result<Vec<BranchStatus>> {
        let mut walk = AncestryWalk::new();
        let mut statuses = Vec::new();

        for branch in self.repo.branches(Some(git2::BranchType::Local))? {
            let (branch, _) = branch?;
            statuses.push(BranchStatus::of(self, branch.get(), &mut walk)?);
        }

        if include_remote {
            let remote_prefix = self.config.remote_prefix();
            for branch in self.repo.branches(Some(git2::BranchType::Remote))? {
                let (branch, _) = branch?;
                let reference = branch.get();
                // Skip origin/HEAD and refs on other remotes.
                if reference.kind() == Some(git2::ReferenceType::Symbolic) {
                    continue;
                }
                match reference.name() {
                    Some(name) if name.starts_with(&remote_prefix) => {
                        statuses.push(BranchStatus::of(self, reference, &mut walk)?);
                    }
                    _ => {}
                }
            }
        }

        debug!(count = statuses.len(), "computed branch statuses");
        Ok(statuses)
    }

    /// Whether a ref with this exact full name exists. Not-found is a result,
    /// any other lookup failure is an error.
    pub(crate) fn ref_exists(&self, full_name: &str) -> Result<bool> {
        match self.repo.find_reference(full_name) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Full name of the currently checked-out branch, from HEAD's symbolic
    /// target. `None` when HEAD is detached. An unborn branch still has a
    /// symbolic target and resolves normally.
    pub(crate) fn head_ref_name(&self) -> Result<Option<String>> {
        let head = self.repo.find_reference("HEAD")?;
        Ok(head.symbolic_target().map(str::to_owned))
    }

    /// Upstream ref name configured for a local branch, read from git config.
    /// Works even when the remote-tracking ref no longer exists. `None` when
    /// no tracking is configured.
    pub(crate) fn upstream_name(&self, short_name: &str) -> Result<Option<String>> {
        let refname = format!("{LOCAL_PREFIX}{short_name}");
        match self.repo.branch_upstream_name(&refname) {
            Ok(buf) => Ok(Some(String::from_utf8_lossy(&buf).into_owned())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Ahead/behind counts for the local branch of this short name relative
    /// to its configured upstream. `None` when the branch has no upstream or
    /// no local branch of that name exists.
    pub(crate) fn tracking_status(&self, short_name: &str) -> Result<Option<(usize, usize)>> {
        let local = match self.repo.find_branch(short_name, git2::BranchType::Local) {
            Ok(branch) => branch,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let upstream = match local.upstream() {
            Ok(upstream) => upstream,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let (Some(local_oid), Some(upstream_oid)) = (local.get().target(), upstream.get().target())
        else {
            return Ok(None);
        };

        Ok(Some(self.repo.graph_ahead_behind(local_oid, upstream_oid)?))
    }

    /// Full name and tip oid of every local branch ref.
    pub(crate) fn local_branch_tips(&self) -> Result<Vec<(String, Oid)>> {
        let mut tips = Vec::new();
        for branch in self.repo.branches(Some(git2::BranchType::Local))? {
            let (branch, _) = branch?;
            let reference = branch.get();
            let Some(name) = reference.name() else {
                continue;
            };
            let oid = match reference.target() {
                Some(oid) => oid,
                None => reference.peel_to_commit()?.id(),
            };
            tips.push((name.to_owned(), oid));
        }
        Ok(tips)
    }
}
