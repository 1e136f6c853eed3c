//! Change classifier for PortSync.
//!
//! Decides per changed file whether it is mirrored into the target codebase
//! or deliberately excluded (UI, login, auth). Files the classifier cannot
//! decide on its own are flagged [`Classification::Ambiguous`] and left for
//! an operator; there is no fallback heuristic.

pub mod classifier;
pub mod error;
pub mod pattern;

pub use classifier::{
    AmbiguousClassification, Classification, Classifier, DEFAULT_CONTENT_PATTERNS,
    DEFAULT_EXCLUDE_PATTERNS,
};
pub use error::{ClassifyError, ClassifyResult};
pub use pattern::{ContentPattern, PathPattern};
