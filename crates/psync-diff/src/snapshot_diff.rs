//! Path-level diff: compare two snapshots and list the paths that changed.
//!
//! A snapshot maps repository-relative paths to file contents. Entries are
//! compared by path; a deletion and an addition with byte-identical contents
//! are reported as a single rename.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Repository contents at one revision: path to bytes.
pub type Snapshot = BTreeMap<String, Vec<u8>>;

/// How a path changed between two revisions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    /// Moved from `from`; the content may also have changed.
    Renamed { from: String },
}

impl ChangeKind {
    /// Short lowercase label (`added`, `modified`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed { .. } => "renamed",
        }
    }

    /// The path the file had at the base revision, if different.
    pub fn previous_path(&self) -> Option<&str> {
        match self {
            ChangeKind::Renamed { from } => Some(from),
            _ => None,
        }
    }
}

/// One changed path. For renames `path` is the new path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathChange {
    pub path: String,
    #[serde(flatten)]
    pub kind: ChangeKind,
}

impl PathChange {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// The path to read at the base revision (`None` for additions).
    pub fn base_path(&self) -> Option<&str> {
        match &self.kind {
            ChangeKind::Added => None,
            ChangeKind::Renamed { from } => Some(from),
            ChangeKind::Modified | ChangeKind::Deleted => Some(&self.path),
        }
    }

    /// The path to read at the head revision (`None` for deletions).
    pub fn head_path(&self) -> Option<&str> {
        match self.kind {
            ChangeKind::Deleted => None,
            _ => Some(&self.path),
        }
    }
}

/// Compare two snapshots. The result is sorted by path.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> Vec<PathChange> {
    let mut changes = Vec::new();
    let mut deleted: Vec<&String> = Vec::new();
    let mut added: Vec<&String> = Vec::new();

    for (path, old_content) in old {
        match new.get(path) {
            Some(new_content) if new_content != old_content => {
                changes.push(PathChange::new(path.clone(), ChangeKind::Modified));
            }
            Some(_) => {}
            None => deleted.push(path),
        }
    }

    for path in new.keys() {
        if !old.contains_key(path) {
            added.push(path);
        }
    }

    // Rename detection: pair deletions and additions with identical, non-empty
    // contents. Empty files are never rename candidates.
    let mut matched_adds = BTreeSet::new();
    for del_path in deleted {
        let del_content = &old[del_path];
        let partner = added.iter().enumerate().find(|(ai, add_path)| {
            !del_content.is_empty()
                && !matched_adds.contains(ai)
                && &new[add_path.as_str()] == del_content
        });

        match partner {
            Some((ai, add_path)) => {
                matched_adds.insert(ai);
                changes.push(PathChange::new(
                    (*add_path).clone(),
                    ChangeKind::Renamed {
                        from: del_path.clone(),
                    },
                ));
            }
            None => changes.push(PathChange::new(del_path.clone(), ChangeKind::Deleted)),
        }
    }

    for (ai, path) in added.iter().enumerate() {
        if !matched_adds.contains(&ai) {
            changes.push(PathChange::new((*path).clone(), ChangeKind::Added));
        }
    }

    changes.sort_by(|a, b| a.path.cmp(&b.path));
    changes
}
