//! Sync checklist for PortSync.
//!
//! The [`Checklist`] holds exactly one [`ChecklistEntry`] per changed file of
//! an inventory, in inventory order. Entries are never removed; they move
//! between [`SyncStatus`](psync_types::SyncStatus) values as the operator
//! works through them, and they record test parity for each suite.
//!
//! # Design Rules
//!
//! 1. An entry may leave `pending` only once its verdict is decided.
//! 2. `done` requires a `mirror` verdict.
//! 3. Ambiguous entries are resolved by an operator, never automatically.
//! 4. The on-disk form is pretty-printed JSON, replaced atomically on save.

pub mod checklist;
pub mod entry;
pub mod error;
pub mod store;

pub use checklist::{Assessment, Checklist};
pub use entry::ChecklistEntry;
pub use error::{ChecklistError, ChecklistResult};
pub use store::{ChecklistStore, DEFAULT_CHECKLIST_PATH};
