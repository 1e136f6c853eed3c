//! Change inventory for PortSync.
//!
//! Given a base and head revision and a source subtree, produces the ordered
//! list of [`ChangedFile`](psync_types::ChangedFile)s in that range. Only file
//! contents are consulted; commit messages are never read.
//!
//! # Revision sources
//!
//! All backends implement the [`RevisionSource`] trait:
//!
//! - [`GitCli`] -- shells out to the `git` binary in a repository directory
//! - [`InMemoryHistory`] -- named snapshots for tests and embedding

pub mod error;
pub mod git;
pub mod inventory;
pub mod memory;
pub mod source;

pub use error::{InventoryError, InventoryResult};
pub use git::{parse_name_status, GitCli};
pub use inventory::{normalize_root, path_in_root, ChangeInventory, Inventory, InventoryWarning, RevisionRange};
pub use memory::InMemoryHistory;
pub use source::RevisionSource;
