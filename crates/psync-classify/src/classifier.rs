use psync_types::{ChangedFile, Verdict};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ClassifyResult;
use crate::pattern::{ContentPattern, PathPattern};

/// Path patterns excluded when none are configured.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["ui", "login", "auth"];

/// Content keywords that flag an otherwise mirrored file for review.
pub const DEFAULT_CONTENT_PATTERNS: &[&str] = &["login", "auth"];

/// Longest excerpt of a matching line kept in a review reason.
const EXCERPT_CHARS: usize = 80;

/// Outcome of classifying one changed file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Classification {
    Decided {
        verdict: Verdict,
        /// The exclude pattern that matched, for `Exclude` verdicts.
        matched_pattern: Option<String>,
    },
    Ambiguous(AmbiguousClassification),
}

impl Classification {
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Classification::Decided { verdict, .. } => Some(*verdict),
            Classification::Ambiguous(_) => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Classification::Ambiguous(_))
    }
}

/// The classifier could not decide between mirror and exclude. Only an
/// operator may resolve it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("ambiguous classification: {}", .reasons.join("; "))]
pub struct AmbiguousClassification {
    pub reasons: Vec<String>,
}

/// Assigns mirror/exclude verdicts from configurable patterns.
#[derive(Clone, Debug)]
pub struct Classifier {
    exclude: Vec<PathPattern>,
    content: Vec<ContentPattern>,
}

impl Classifier {
    /// Build a classifier from exclude path patterns and content keywords.
    pub fn new<E, C>(exclude_patterns: E, content_patterns: C) -> ClassifyResult<Self>
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let exclude = exclude_patterns
            .into_iter()
            .map(|p| PathPattern::new(p.as_ref()))
            .collect::<ClassifyResult<Vec<_>>>()?;
        let content = content_patterns
            .into_iter()
            .map(|p| ContentPattern::new(p.as_ref()))
            .collect::<ClassifyResult<Vec<_>>>()?;
        Ok(Self { exclude, content })
    }

    /// The first exclude pattern matching `path`.
    pub fn matching_pattern(&self, path: &str) -> Option<&str> {
        self.exclude
            .iter()
            .find(|p| p.is_match(path))
            .map(PathPattern::as_str)
    }

    /// Classify one file.
    ///
    /// A path match on the head path is decisive: the file is excluded. A
    /// rename out of an excluded path, or a mirrored file whose changed lines
    /// mention a content keyword, is ambiguous.
    pub fn classify(&self, file: &ChangedFile) -> Classification {
        if let Some(pattern) = self.matching_pattern(&file.path) {
            debug!(path = %file.path, pattern, "excluded");
            return Classification::Decided {
                verdict: Verdict::Exclude,
                matched_pattern: Some(pattern.to_string()),
            };
        }

        if let Some(from) = file.kind.previous_path() {
            if let Some(old_pattern) = self.matching_pattern(from) {
                let reason = format!(
                    "renamed from {from} (matches {old_pattern:?}) to {} (no exclude pattern)",
                    file.path
                );
                warn!(path = %file.path, "ambiguous: {reason}");
                return Classification::Ambiguous(AmbiguousClassification {
                    reasons: vec![reason],
                });
            }
        }

        let reasons = self.content_reasons(file);
        if !reasons.is_empty() {
            warn!(path = %file.path, hits = reasons.len(), "ambiguous: changed lines mention excluded topics");
            return Classification::Ambiguous(AmbiguousClassification { reasons });
        }

        debug!(path = %file.path, "mirrored");
        Classification::Decided {
            verdict: Verdict::Mirror,
            matched_pattern: None,
        }
    }

    fn content_reasons(&self, file: &ChangedFile) -> Vec<String> {
        if file.is_binary() {
            return Vec::new();
        }
        self.content
            .iter()
            .filter_map(|pattern| {
                let line = file.changed_lines().find(|l| pattern.is_match(l))?;
                Some(format!(
                    "changed lines mention {:?}: `{}`",
                    pattern.as_str(),
                    excerpt(line)
                ))
            })
            .collect()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            exclude: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .filter_map(|p| PathPattern::new(p).ok())
                .collect(),
            content: DEFAULT_CONTENT_PATTERNS
                .iter()
                .filter_map(|p| ContentPattern::new(p).ok())
                .collect(),
        }
    }
}

fn excerpt(line: &str) -> String {
    let line = line.trim();
    if line.chars().count() <= EXCERPT_CHARS {
        return line.to_string();
    }
    let cut: String = line.chars().take(EXCERPT_CHARS).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use psync_diff::diff_contents;
    use psync_types::{ChangeKind, FileDiff};

    fn modified(path: &str, old: &str, new: &str) -> ChangedFile {
        ChangedFile::new(
            path,
            ChangeKind::Modified,
            diff_contents(Some(old.as_bytes()), Some(new.as_bytes())),
        )
    }

    #[test]
    fn login_path_is_excluded() {
        let classifier = Classifier::default();
        let file = modified("src/kimi_cli/login.py", "a\n", "b\n");
        assert_eq!(
            classifier.classify(&file),
            Classification::Decided {
                verdict: Verdict::Exclude,
                matched_pattern: Some("login".into()),
            }
        );
    }

    #[test]
    fn plain_logic_is_mirrored() {
        let classifier = Classifier::default();
        let file = modified("src/kimi_cli/llm.py", "x = 1\n", "x = 2\n");
        assert_eq!(classifier.classify(&file).verdict(), Some(Verdict::Mirror));
    }

    #[test]
    fn content_mention_is_ambiguous() {
        let classifier = Classifier::default();
        let file = modified(
            "src/kimi_cli/llm.py",
            "def chat():\n    pass\n",
            "def chat():\n    refresh_login_token()\n",
        );
        let Classification::Ambiguous(amb) = classifier.classify(&file) else {
            panic!("expected ambiguous");
        };
        assert_eq!(amb.reasons.len(), 1);
        assert!(amb.reasons[0].contains("\"login\""));
        assert!(amb.to_string().starts_with("ambiguous classification"));
    }

    #[test]
    fn context_lines_do_not_trigger_review() {
        let classifier = Classifier::default();
        let file = modified(
            "src/kimi_cli/llm.py",
            "import auth\nx = 1\n",
            "import auth\nx = 2\n",
        );
        assert_eq!(classifier.classify(&file).verdict(), Some(Verdict::Mirror));
    }

    fn renamed(from: &str, to: &str) -> ChangedFile {
        ChangedFile::new(to, ChangeKind::Renamed { from: from.into() }, FileDiff::default())
    }

    #[test]
    fn rename_out_of_excluded_path_is_ambiguous() {
        let classifier = Classifier::default();
        let file = renamed("src/kimi_cli/login_session.py", "src/kimi_cli/session.py");
        let Classification::Ambiguous(amb) = classifier.classify(&file) else {
            panic!("expected ambiguous");
        };
        assert!(amb.reasons[0].contains("\"login\""));
    }

    #[test]
    fn rename_into_excluded_path_is_excluded() {
        let classifier = Classifier::default();
        let file = renamed("src/kimi_cli/_.py", "src/kimi_cli/ui/_.py");
        assert_eq!(
            classifier.classify(&file),
            Classification::Decided {
                verdict: Verdict::Exclude,
                matched_pattern: Some("ui".into()),
            }
        );
    }

    #[test]
    fn rename_within_excluded_area_stays_excluded() {
        let classifier = Classifier::default();
        let file = ChangedFile::new(
            "src/kimi_cli/ui/new.py",
            ChangeKind::Renamed {
                from: "src/kimi_cli/ui/old.py".into(),
            },
            FileDiff::default(),
        );
        assert_eq!(classifier.classify(&file).verdict(), Some(Verdict::Exclude));
    }

    #[test]
    fn custom_patterns_replace_defaults() {
        let classifier = Classifier::new(["**/web/**"], Vec::<String>::new()).unwrap();
        let ui = modified("src/kimi_cli/ui/shell.py", "a\n", "b\n");
        let web = modified("src/kimi_cli/web/app.py", "a\n", "b\n");
        assert_eq!(classifier.classify(&ui).verdict(), Some(Verdict::Mirror));
        assert_eq!(classifier.classify(&web).verdict(), Some(Verdict::Exclude));
    }

    #[test]
    fn author_metadata_is_not_an_auth_mention() {
        let classifier = Classifier::default();
        let file = modified(
            "src/kimi_cli/__init__.py",
            "__author__ = \"a\"\n",
            "__author__ = \"b\"\n",
        );
        assert_eq!(classifier.classify(&file).verdict(), Some(Verdict::Mirror));
    }

    #[test]
    fn excerpt_truncates() {
        let long = "x".repeat(200);
        assert_eq!(excerpt(&long).chars().count(), EXCERPT_CHARS + 3);
    }
}
