use std::collections::BTreeMap;

use psync_diff::{diff_snapshots, PathChange, Snapshot};

use crate::error::{InventoryError, InventoryResult};
use crate::inventory::path_in_root;
use crate::source::RevisionSource;

/// In-memory history of named snapshots.
///
/// Intended for tests and embedding. Each revision name maps to a full
/// snapshot of the tree; the revision name doubles as its identifier.
#[derive(Clone, Debug, Default)]
pub struct InMemoryHistory {
    revisions: BTreeMap<String, Snapshot>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a revision built from `(path, content)` pairs.
    pub fn with_revision<I, P, C>(mut self, name: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<Vec<u8>>,
    {
        self.insert(name, files);
        self
    }

    pub fn insert<I, P, C>(&mut self, name: impl Into<String>, files: I)
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<Vec<u8>>,
    {
        let snapshot = files
            .into_iter()
            .map(|(p, c)| (p.into(), c.into()))
            .collect();
        self.revisions.insert(name.into(), snapshot);
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    fn snapshot(&self, rev: &str) -> InventoryResult<&Snapshot> {
        self.revisions
            .get(rev)
            .ok_or_else(|| InventoryError::RangeResolution {
                rev: rev.to_string(),
                reason: "unknown revision".into(),
            })
    }
}

impl RevisionSource for InMemoryHistory {
    fn resolve(&self, rev: &str) -> InventoryResult<String> {
        self.snapshot(rev).map(|_| rev.to_string())
    }

    fn changed_paths(&self, base: &str, head: &str, root: &str) -> InventoryResult<Vec<PathChange>> {
        // Narrow both sides first so renames across the root boundary read as
        // plain additions or deletions, the way a git pathspec behaves.
        let scoped = |snapshot: &Snapshot| -> Snapshot {
            snapshot
                .iter()
                .filter(|(path, _)| path_in_root(path, root))
                .map(|(p, c)| (p.clone(), c.clone()))
                .collect()
        };
        let old = scoped(self.snapshot(base)?);
        let new = scoped(self.snapshot(head)?);
        Ok(diff_snapshots(&old, &new))
    }

    fn read_file(&self, rev: &str, path: &str) -> InventoryResult<Option<Vec<u8>>> {
        Ok(self.snapshot(rev)?.get(path).cloned())
    }
}
