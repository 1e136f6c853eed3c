//! Report generator for PortSync.
//!
//! Two outputs are produced from a [`Checklist`](psync_checklist::Checklist):
//!
//! - a tracking table with one row per entry ([`render_checklist_table`])
//! - the final [`Report`], partitioned into synced, skipped, review, unmapped,
//!   gap and pending sections plus test results, rendered as markdown text
//!   ([`Report::render_text`]) or JSON
//!
//! Every entry appears in the test-parity table with all three suites, so
//! parity is never left implicit.

pub mod report;
pub mod table;

pub use report::{
    GapItem, LogicItem, ParityRow, PendingItem, Report, ReviewItem, SkippedItem, SyncedFile,
    TestRunSummary, Totals,
};
pub use table::render_checklist_table;
