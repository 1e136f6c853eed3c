//! The [`RevisionSource`] trait: what the inventory needs from version control.

use psync_diff::PathChange;

use crate::error::InventoryResult;

/// Read-only access to a revision-control history.
///
/// The inventory only consumes these three operations; implementations never
/// need to support writes.
pub trait RevisionSource {
    /// Resolve a revision name (tag, branch, hash) to a stable identifier.
    ///
    /// Must fail with [`InventoryError::RangeResolution`](crate::InventoryError::RangeResolution)
    /// when the revision does not exist.
    fn resolve(&self, rev: &str) -> InventoryResult<String>;

    /// List the paths that differ between two resolved revisions.
    ///
    /// `root` is a normalized subtree prefix (empty for the whole tree) that
    /// implementations may use to narrow the listing.
    fn changed_paths(&self, base: &str, head: &str, root: &str) -> InventoryResult<Vec<PathChange>>;

    /// Read a file at a resolved revision. Returns `Ok(None)` if the path does
    /// not exist there.
    fn read_file(&self, rev: &str, path: &str) -> InventoryResult<Option<Vec<u8>>>;
}
