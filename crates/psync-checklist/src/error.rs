use std::path::PathBuf;

use psync_types::SyncStatus;

/// Errors from checklist operations.
#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    /// No entry tracks the given source path.
    #[error("no checklist entry for {0}")]
    EntryNotFound(String),

    /// The entry is still ambiguous; its status cannot leave `pending`.
    #[error("{path} has no verdict yet; resolve it before marking it {status}")]
    VerdictUndecided { path: String, status: SyncStatus },

    /// The requested status contradicts the entry's verdict.
    #[error("cannot mark {path} {status}: {reason}")]
    InvalidTransition {
        path: String,
        status: SyncStatus,
        reason: String,
    },

    /// No checklist has been written at the given location.
    #[error("no checklist at {}; run `psync plan` first", .0.display())]
    Missing(PathBuf),

    /// A checklist already exists and would be overwritten.
    #[error("a checklist already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("checklist file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to replace checklist file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type ChecklistResult<T> = Result<T, ChecklistError>;
