use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("cannot read config {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Inventory(#[from] psync_inventory::InventoryError),

    #[error(transparent)]
    Classify(#[from] psync_classify::ClassifyError),

    #[error(transparent)]
    Mapping(#[from] psync_mapping::MappingError),

    #[error(transparent)]
    Checklist(#[from] psync_checklist::ChecklistError),

    #[error(transparent)]
    Runner(#[from] psync_runner::RunnerError),
}

pub type SdkResult<T> = Result<T, SdkError>;
