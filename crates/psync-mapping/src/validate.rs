//! Rule validation.
//!
//! Valid mapping rules:
//! - `from` must be non-empty once surrounding slashes are ignored
//! - neither side may be absolute or contain a `..` component
//! - neither side may contain a backslash
//!
//! Valid extension rules:
//! - both sides must start with `.` and contain no `/`

use psync_types::{ExtensionRule, MappingRule};

use crate::error::{MappingError, MappingResult};

/// Validate a prefix rule, returning `Ok(())` if it can be applied.
///
/// # Examples
///
/// ```
/// use psync_mapping::validate_mapping_rule;
/// use psync_types::MappingRule;
///
/// assert!(validate_mapping_rule(&MappingRule::new("src/kimi_cli/", "rust/kagent/src/")).is_ok());
/// assert!(validate_mapping_rule(&MappingRule::new("", "rust/")).is_err());
/// assert!(validate_mapping_rule(&MappingRule::new("src/", "../elsewhere/")).is_err());
/// ```
pub fn validate_mapping_rule(rule: &MappingRule) -> MappingResult<()> {
    let invalid = |reason: &str| MappingError::InvalidRule {
        rule: rule.to_string(),
        reason: reason.to_string(),
    };

    if rule.from.trim_matches('/').is_empty() {
        return Err(invalid("source prefix must not be empty"));
    }

    for side in [&rule.from, &rule.to] {
        if side.starts_with('/') {
            return Err(invalid("prefixes must be repository-relative"));
        }
        if side.contains('\\') {
            return Err(invalid("prefixes must use '/' separators"));
        }
        if side.split('/').any(|part| part == "..") {
            return Err(invalid("prefixes must not contain '..'"));
        }
    }

    Ok(())
}

/// Validate an extension rule.
pub fn validate_extension_rule(rule: &ExtensionRule) -> MappingResult<()> {
    let invalid = |reason: &str| MappingError::InvalidExtension {
        rule: rule.to_string(),
        reason: reason.to_string(),
    };

    for side in [&rule.from, &rule.to] {
        if !side.starts_with('.') || side.len() < 2 {
            return Err(invalid("extensions must look like '.py'"));
        }
        if side.contains('/') {
            return Err(invalid("extensions must not contain '/'"));
        }
    }

    Ok(())
}
