//! Branch synchronization status for git repositories.
//!
//! Answers the questions a collaboration tool asks before allowing a push,
//! pull, merge, or delete: does this branch exist locally and remotely, is it
//! checked out, does it have unpushed or unpulled commits, has its remote
//! counterpart been deleted, and has its tip already been merged into another
//! branch? Each [`BranchStatus`] is a read-only, point-in-time snapshot; the
//! crate never mutates the repository.

mod config;
mod error;
mod git;

pub use config::StatusConfig;
pub use error::{Error, Result};
pub use git::{BranchStatus, CommitInfo, Repository};
