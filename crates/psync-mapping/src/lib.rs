//! Path mapper for PortSync.
//!
//! Translates a changed source path into the path it is expected to have in
//! the target codebase. Rules are ordered prefix rewrites; the first match
//! wins. A path no rule covers is reported as [`MappingOutcome::Unmapped`],
//! never guessed.
//!
//! Extension rewriting (`.py` to `.rs`) is a separate, explicit rule list that
//! only applies after a prefix rule matched.

pub mod error;
pub mod mapper;
pub mod validate;

pub use error::{MappingError, MappingResult};
pub use mapper::{MappingOutcome, PathMapper};
pub use validate::{validate_extension_rule, validate_mapping_rule};
