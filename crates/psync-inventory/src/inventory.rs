//! The [`ChangeInventory`]: changed paths plus per-file hunks for a range.

use std::fmt;

use psync_diff::diff_contents;
use psync_types::ChangedFile;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{InventoryError, InventoryResult};
use crate::source::RevisionSource;

/// The revision range and subtree to inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRange {
    pub base: String,
    pub head: String,
    /// Subtree of the source codebase; empty or `.` for the whole tree.
    pub source_root: String,
}

impl RevisionRange {
    pub fn new(base: impl Into<String>, head: impl Into<String>, source_root: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            head: head.into(),
            source_root: source_root.into(),
        }
    }
}

/// Non-fatal conditions noticed while building an inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryWarning {
    /// No file under the source root changed in the range.
    EmptyRange,
}

impl fmt::Display for InventoryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryWarning::EmptyRange => f.write_str("no changes in range"),
        }
    }
}

/// Every file that changed in a range, ordered by path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub range: RevisionRange,
    pub base_id: String,
    pub head_id: String,
    pub files: Vec<ChangedFile>,
    pub warning: Option<InventoryWarning>,
}

impl Inventory {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Builds inventories from a [`RevisionSource`].
pub struct ChangeInventory<'a> {
    source: &'a dyn RevisionSource,
}

impl<'a> ChangeInventory<'a> {
    pub fn new(source: &'a dyn RevisionSource) -> Self {
        Self { source }
    }

    /// Collect the changed files for `range`.
    ///
    /// Both revisions are resolved before anything else is read, so an
    /// unresolvable revision fails without producing a partial inventory.
    pub fn collect(&self, range: &RevisionRange) -> InventoryResult<Inventory> {
        let root = normalize_root(&range.source_root)?;
        let base_id = self.source.resolve(&range.base)?;
        let head_id = self.source.resolve(&range.head)?;

        let mut changes = self.source.changed_paths(&base_id, &head_id, &root)?;
        changes.retain(|c| path_in_root(&c.path, &root));
        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes.dedup_by(|a, b| a.path == b.path);

        let mut files = Vec::with_capacity(changes.len());
        for change in changes {
            let old = match change.base_path() {
                Some(path) => self.source.read_file(&base_id, path)?,
                None => None,
            };
            let new = match change.head_path() {
                Some(path) => self.source.read_file(&head_id, path)?,
                None => None,
            };
            let diff = diff_contents(old.as_deref(), new.as_deref());
            debug!(
                path = %change.path,
                kind = change.kind.label(),
                additions = diff.additions(),
                deletions = diff.deletions(),
                "inventoried"
            );
            files.push(ChangedFile::new(change.path, change.kind, diff));
        }

        let warning = if files.is_empty() {
            warn!(base = %range.base, head = %range.head, root = %root, "no changes in range");
            Some(InventoryWarning::EmptyRange)
        } else {
            info!(base = %range.base, head = %range.head, files = files.len(), "inventory complete");
            None
        };

        Ok(Inventory {
            range: range.clone(),
            base_id,
            head_id,
            files,
            warning,
        })
    }
}

/// Normalize a subtree prefix: strip `./` and surrounding slashes, map `.` to
/// the empty (whole-tree) root, and reject absolute or escaping paths.
pub fn normalize_root(root: &str) -> InventoryResult<String> {
    let trimmed = root.trim();
    if trimmed.starts_with('/') || trimmed.contains('\\') {
        return Err(InventoryError::InvalidSourceRoot(root.to_string()));
    }

    let mut parts = Vec::new();
    for part in trimmed.split('/') {
        match part {
            "" | "." => {}
            ".." => return Err(InventoryError::InvalidSourceRoot(root.to_string())),
            other => parts.push(other),
        }
    }
    Ok(parts.join("/"))
}

/// Returns `true` if `path` is `root` itself or lies below it. Matching is on
/// whole path components: `src/a` contains `src/a/x.py` but not `src/ab/x.py`.
pub fn path_in_root(path: &str, root: &str) -> bool {
    if root.is_empty() {
        return true;
    }
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
