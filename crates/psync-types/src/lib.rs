//! Core data model for PortSync.
//!
//! Every other crate in the workspace speaks in these types: the inventory
//! produces [`ChangedFile`]s, the mapper consumes [`MappingRule`]s, the
//! classifier yields a [`Verdict`], and the checklist tracks a [`SyncStatus`]
//! and [`TestParity`] per file.

pub mod changed_file;
pub mod error;
pub mod rule;
pub mod status;
pub mod testing;

pub use changed_file::ChangedFile;
pub use error::ParseError;
pub use psync_diff::{ChangeKind, FileDiff, Hunk, HunkLine};
pub use rule::{ExtensionRule, MappingRule};
pub use status::{SyncStatus, Verdict};
pub use testing::{ParityStatus, TestOutcome, TestParity, TestResult, TestRun, TestSuite};
