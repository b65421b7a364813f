use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};

use git2::Oid;

use crate::error::Result;

/// Commit-graph walk context shared across ancestry queries.
///
/// Caches parent lists so that testing one tip against many branch heads does
/// not re-read the same commits. Dropped when the enumeration ends, on every
/// exit path.
pub(crate) struct AncestryWalk {
    parents: HashMap<Oid, Vec<Oid>>,
}

impl AncestryWalk {
    pub(crate) fn new() -> Self {
        Self {
            parents: HashMap::new(),
        }
    }

    /// True if `ancestor` is reachable from `descendant` by following parent
    /// links zero or more times. Identity counts.
    pub(crate) fn is_ancestor_of(
        &mut self,
        repo: &git2::Repository,
        ancestor: Oid,
        descendant: Oid,
    ) -> Result<bool> {
        if ancestor == descendant {
            return Ok(true);
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(descendant);

        while let Some(oid) = queue.pop_front() {
            if !seen.insert(oid) {
                continue;
            }
            for &parent in self.parents_of(repo, oid)? {
                if parent == ancestor {
                    return Ok(true);
                }
                queue.push_back(parent);
            }
        }

        Ok(false)
    }

    fn parents_of(&mut self, repo: &git2::Repository, oid: Oid) -> Result<&[Oid]> {
        match self.parents.entry(oid) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_slice()),
            Entry::Vacant(entry) => {
                let commit = repo.find_commit(oid)?;
                let parents: Vec<Oid> = commit.parent_ids().collect();
                Ok(entry.insert(parents).as_slice())
            }
        }
    }

    #[cfg(test)]
    fn cached_commits(&self) -> usize {
        self.parents.len()
    }
}
