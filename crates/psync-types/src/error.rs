//! Error type for parsing the textual forms of the core types.

/// Errors from parsing command-line or config representations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A rule was not of the form `FROM=TO`.
    #[error("invalid rule {0:?}: expected FROM=TO")]
    InvalidRule(String),

    /// A keyword did not name any known variant.
    #[error("unknown {kind} {value:?} (expected one of: {expected})")]
    UnknownValue {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}
