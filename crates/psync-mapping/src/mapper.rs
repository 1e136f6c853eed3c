use psync_types::{ExtensionRule, MappingRule};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MappingResult;
use crate::validate::{validate_extension_rule, validate_mapping_rule};

/// Result of mapping one source path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MappingOutcome {
    Mapped {
        target: String,
        /// The rule that produced `target`.
        rule: MappingRule,
    },
    /// No rule covers the path; an operator must add one.
    Unmapped,
}

impl MappingOutcome {
    pub fn target(&self) -> Option<&str> {
        match self {
            MappingOutcome::Mapped { target, .. } => Some(target),
            MappingOutcome::Unmapped => None,
        }
    }

    pub fn is_unmapped(&self) -> bool {
        matches!(self, MappingOutcome::Unmapped)
    }
}

/// Ordered prefix rules plus optional extension rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathMapper {
    rules: Vec<MappingRule>,
    extensions: Vec<ExtensionRule>,
}

impl PathMapper {
    /// Build a mapper, validating every rule.
    pub fn new(rules: Vec<MappingRule>, extensions: Vec<ExtensionRule>) -> MappingResult<Self> {
        for rule in &rules {
            validate_mapping_rule(rule)?;
        }
        for rule in &extensions {
            validate_extension_rule(rule)?;
        }
        Ok(Self { rules, extensions })
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn extensions(&self) -> &[ExtensionRule] {
        &self.extensions
    }

    /// Map `path` with the first rule whose source prefix covers it.
    ///
    /// Prefixes match whole path components. The remainder after the prefix
    /// is appended to the target prefix, then the first matching extension
    /// rule rewrites the suffix.
    pub fn map(&self, path: &str) -> MappingOutcome {
        for rule in &self.rules {
            let Some(rest) = strip_component_prefix(path, &rule.from) else {
                continue;
            };
            let target = self.rewrite_extension(join_target(&rule.to, rest));
            debug!(path, target = %target, rule = %rule, "mapped");
            return MappingOutcome::Mapped {
                target,
                rule: rule.clone(),
            };
        }
        debug!(path, "unmapped");
        MappingOutcome::Unmapped
    }

    fn rewrite_extension(&self, target: String) -> String {
        let file_name = target.rsplit('/').next().unwrap_or(&target);
        for ext in &self.extensions {
            // Only a real suffix: `.py` alone is a dotfile name, not an extension.
            if file_name.len() > ext.from.len() && file_name.ends_with(ext.from.as_str()) {
                let stem = &target[..target.len() - ext.from.len()];
                return format!("{stem}{}", ext.to);
            }
        }
        target
    }
}

/// If `prefix` covers `path` on a component boundary, return the remainder:
/// empty for an exact match, otherwise starting with `/`.
fn strip_component_prefix<'p>(path: &'p str, prefix: &str) -> Option<&'p str> {
    let prefix = prefix.trim_end_matches('/');
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

fn join_target(to: &str, rest: &str) -> String {
    if rest.is_empty() {
        return to.to_string();
    }
    let base = to.trim_end_matches('/');
    if base.is_empty() {
        rest.trim_start_matches('/').to_string()
    } else {
        format!("{base}{rest}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kimi_mapper(extensions: Vec<ExtensionRule>) -> PathMapper {
        PathMapper::new(
            vec![
                MappingRule::new("src/kimi_cli/tools/", "rust/kagent/src/tools/"),
                MappingRule::new("src/kimi_cli/", "rust/kagent/src/"),
                MappingRule::new("tests/", "rust/kagent/tests/"),
            ],
            extensions,
        )
        .unwrap()
    }

    #[test]
    fn prefix_rule_keeps_extension_by_default() {
        let mapper = kimi_mapper(vec![]);
        assert_eq!(mapper.map("src/kimi_cli/llm.py").target(), Some("rust/kagent/src/llm.py"));
    }

    #[test]
    fn explicit_extension_rule_rewrites_suffix() {
        let mapper = kimi_mapper(vec![ExtensionRule::new(".py", ".rs")]);
        assert_eq!(mapper.map("src/kimi_cli/llm.py").target(), Some("rust/kagent/src/llm.rs"));
        assert_eq!(
            mapper.map("src/kimi_cli/prompts/system.md").target(),
            Some("rust/kagent/src/prompts/system.md")
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        let mapper = kimi_mapper(vec![]);
        match mapper.map("src/kimi_cli/tools/shell.py") {
            MappingOutcome::Mapped { target, rule } => {
                assert_eq!(target, "rust/kagent/src/tools/shell.py");
                assert_eq!(rule.from, "src/kimi_cli/tools/");
            }
            MappingOutcome::Unmapped => panic!("expected a mapping"),
        }
    }

    #[test]
    fn unmatched_path_is_unmapped() {
        let mapper = kimi_mapper(vec![]);
        assert!(mapper.map("scripts/release.sh").is_unmapped());
        assert!(mapper.map("src/kimi_cli_extra/x.py").is_unmapped());
    }

    #[test]
    fn prefix_without_trailing_slash_matches_components() {
        let mapper = PathMapper::new(vec![MappingRule::new("src/pkg", "rust/src")], vec![]).unwrap();
        assert_eq!(mapper.map("src/pkg/a.py").target(), Some("rust/src/a.py"));
        assert!(mapper.map("src/pkgs/a.py").is_unmapped());
    }

    #[test]
    fn exact_file_rule() {
        let mapper = PathMapper::new(
            vec![MappingRule::new("src/pkg/__init__.py", "rust/src/lib.rs")],
            vec![ExtensionRule::new(".py", ".rs")],
        )
        .unwrap();
        assert_eq!(mapper.map("src/pkg/__init__.py").target(), Some("rust/src/lib.rs"));
    }

    #[test]
    fn empty_target_maps_to_target_root() {
        let mapper = PathMapper::new(vec![MappingRule::new("src/pkg/", "")], vec![]).unwrap();
        assert_eq!(mapper.map("src/pkg/a/b.py").target(), Some("a/b.py"));
    }

    #[test]
    fn invalid_rules_rejected_at_construction() {
        assert!(PathMapper::new(vec![MappingRule::new("", "x")], vec![]).is_err());
        assert!(PathMapper::new(vec![], vec![ExtensionRule::new("py", "rs")]).is_err());
    }

    proptest! {
        #[test]
        fn mapped_output_starts_with_target_prefix(
            rest in "[a-z]{1,8}(/[a-z]{1,8}){0,3}\\.py",
            to in "[a-z]{1,6}(/[a-z]{1,6}){0,2}/",
        ) {
            let mapper = PathMapper::new(vec![MappingRule::new("src/pkg/", to.clone())], vec![]).unwrap();
            let path = format!("src/pkg/{rest}");
            let target = mapper.map(&path).target().map(str::to_string);
            prop_assert!(target.is_some());
            prop_assert!(target.unwrap().starts_with(&to));
        }

        #[test]
        fn paths_outside_every_rule_are_unmapped(rest in "[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
            let mapper = PathMapper::new(vec![MappingRule::new("src/pkg/", "rust/")], vec![]).unwrap();
            let path = format!("other/{rest}");
            prop_assert!(mapper.map(&path).is_unmapped());
        }
    }
}
