/// Errors from building a classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// A pattern was empty or whitespace.
    #[error("empty classification pattern")]
    EmptyPattern,

    /// A glob pattern failed to compile.
    #[error("invalid glob pattern {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

pub type ClassifyResult<T> = Result<T, ClassifyError>;
