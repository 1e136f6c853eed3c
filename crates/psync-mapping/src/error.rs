/// Errors from building a path mapper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("invalid mapping rule {rule}: {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("invalid extension rule {rule}: {reason}")]
    InvalidExtension { rule: String, reason: String },
}

pub type MappingResult<T> = Result<T, MappingError>;
