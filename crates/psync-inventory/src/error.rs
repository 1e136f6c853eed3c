//! Error types for the inventory crate.

/// Errors that can occur while building an inventory.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// A revision could not be resolved to a commit. Fatal: no partial
    /// inventory is produced.
    #[error("cannot resolve revision {rev:?}: {reason}")]
    RangeResolution { rev: String, reason: String },

    /// A revision-control command exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    /// The revision-control tool could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Output from the revision-control tool could not be parsed.
    #[error("malformed output: {0}")]
    MalformedOutput(String),

    /// The source root is absolute or escapes the repository.
    #[error("invalid source root {0:?}")]
    InvalidSourceRoot(String),
}

/// Convenience alias for inventory results.
pub type InventoryResult<T> = Result<T, InventoryError>;
