use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Resolved tip commit of a branch ref.
#[derive(Debug, Clone, Serialize)]
pub struct CommitInfo {
    pub id: String,
    pub short_id: String,
    /// First line of the commit message.
    pub summary: String,
    pub author: String,
    pub email: String,
    /// Commit time in seconds since the epoch.
    pub time: i64,
}

impl CommitInfo {
    pub fn from_commit(commit: &git2::Commit) -> Self {
        let id = commit.id().to_string();
        let short_id = id[..7.min(id.len())].to_string();

        Self {
            id,
            short_id,
            summary: commit
                .message()
                .unwrap_or("")
                .lines()
                .next()
                .unwrap_or("")
                .to_string(),
            author: commit.author().name().unwrap_or("").to_string(),
            email: commit.author().email().unwrap_or("").to_string(),
            time: commit.time().seconds(),
        }
    }

    /// Commit time as a UTC timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.time, 0).single().unwrap_or_default()
    }
}
