use serde::{Deserialize, Serialize};

/// Local branch namespace prefix.
pub(crate) const LOCAL_PREFIX: &str = "refs/heads/";

/// Namespace conventions for status computation.
///
/// The remote prefix is parameterized by a single canonical remote; a branch
/// tracked on any other remote is outside these conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Canonical remote name, e.g. "origin".
    pub remote: String,
    /// Short name of the primary integration branch, always considered merged.
    pub primary_branch: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            primary_branch: "master".to_string(),
        }
    }
}

impl StatusConfig {
    /// Remote branch namespace prefix, e.g. "refs/remotes/origin/".
    pub(crate) fn remote_prefix(&self) -> String {
        format!("refs/remotes/{}/", self.remote)
    }
}
