mod branch;
mod commit;
mod repository;
mod walk;

pub use branch::BranchStatus;
pub use commit::CommitInfo;
pub use repository::Repository;
