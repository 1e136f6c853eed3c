//! Diff engine for PortSync.
//!
//! Computes the two kinds of difference the sync pipeline needs: which paths
//! changed between two revisions, and what changed inside each file.
//!
//! # Key Types
//!
//! - [`PathChange`] / [`ChangeKind`] -- path-level change (added/deleted/modified/renamed)
//! - [`FileDiff`] / [`Hunk`] / [`HunkLine`] -- line-level content diff

pub mod content_diff;
pub mod snapshot_diff;

pub use content_diff::{diff_contents, FileDiff, Hunk, HunkLine};
pub use snapshot_diff::{diff_snapshots, ChangeKind, PathChange, Snapshot};
