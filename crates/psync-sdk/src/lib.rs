//! High-level SDK for PortSync.
//!
//! Ties the pipeline together: a [`SyncConfig`] describes the revision range,
//! classification patterns, mapping rules and test commands; a
//! [`SyncSession`] runs inventory, classification and mapping over a
//! [`RevisionSource`](psync_inventory::RevisionSource) and builds the
//! [`Checklist`](psync_checklist::Checklist).

pub mod config;
pub mod error;
pub mod session;

pub use config::{ConfigOverrides, SyncConfig, DEFAULT_CONFIG_FILE};
pub use error::{SdkError, SdkResult};
pub use session::{run_tests, SyncSession};

// Re-export key types
pub use psync_checklist::{Checklist, ChecklistEntry, ChecklistStore};
pub use psync_classify::Classification;
pub use psync_inventory::{GitCli, InMemoryHistory, Inventory, RevisionRange, RevisionSource};
pub use psync_mapping::MappingOutcome;
pub use psync_report::{render_checklist_table, Report};
pub use psync_runner::{CommandTestRunner, SuiteCommands, TestRunner};
pub use psync_types::{
    ExtensionRule, MappingRule, ParityStatus, SyncStatus, TestRun, TestSuite, Verdict,
};
