//! Path and content patterns.

use globset::{GlobBuilder, GlobMatcher};

use crate::error::{ClassifyError, ClassifyResult};

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// A pattern matched case-insensitively against a full repository path.
///
/// Patterns containing any of `* ? [ {` are globs (where `*` also crosses
/// `/`); anything else is a plain substring.
#[derive(Clone, Debug)]
pub struct PathPattern {
    raw: String,
    matcher: PathMatcher,
}

#[derive(Clone, Debug)]
enum PathMatcher {
    Substring(String),
    Glob(GlobMatcher),
}

impl PathPattern {
    pub fn new(raw: &str) -> ClassifyResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ClassifyError::EmptyPattern);
        }

        let matcher = if raw.contains(GLOB_META) {
            let glob = GlobBuilder::new(raw)
                .case_insensitive(true)
                .literal_separator(false)
                .build()
                .map_err(|source| ClassifyError::InvalidGlob {
                    pattern: raw.to_string(),
                    source,
                })?;
            PathMatcher::Glob(glob.compile_matcher())
        } else {
            PathMatcher::Substring(raw.to_lowercase())
        };

        Ok(Self {
            raw: raw.to_string(),
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_match(&self, path: &str) -> bool {
        match &self.matcher {
            PathMatcher::Substring(needle) => path.to_lowercase().contains(needle.as_str()),
            PathMatcher::Glob(glob) => glob.is_match(path),
        }
    }
}

/// Words that start with a default keyword but never concern it.
const UNRELATED_TOKENS: &[&str] = &["author", "authors", "authored", "authorship", "authority"];

/// A keyword looked for in the changed lines of a diff.
///
/// Alphanumeric keywords match identifier tokens that start with them
/// (`auth` hits `auth_token` and `authenticate`, not `author`); keywords with
/// punctuation fall back to a substring of the line. Matching is
/// case-insensitive.
#[derive(Clone, Debug)]
pub struct ContentPattern {
    raw: String,
    needle: String,
    token: bool,
}

impl ContentPattern {
    pub fn new(raw: &str) -> ClassifyResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ClassifyError::EmptyPattern);
        }
        Ok(Self {
            raw: raw.to_string(),
            needle: raw.to_lowercase(),
            token: raw.chars().all(char::is_alphanumeric),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_match(&self, line: &str) -> bool {
        let line = line.to_lowercase();
        if self.token {
            line.split(|c: char| !c.is_alphanumeric())
                .any(|token| {
                    token.starts_with(self.needle.as_str()) && !UNRELATED_TOKENS.contains(&token)
                })
        } else {
            line.contains(self.needle.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_is_case_insensitive() {
        let p = PathPattern::new("Login").unwrap();
        assert!(p.is_match("src/kimi_cli/LOGIN_flow.py"));
        assert!(!p.is_match("src/kimi_cli/llm.py"));
    }

    #[test]
    fn glob_crosses_directories() {
        let p = PathPattern::new("**/ui/**").unwrap();
        assert!(p.is_match("src/kimi_cli/ui/shell/prompt.py"));
        assert!(p.is_match("src/kimi_cli/UI/x.py"));
        assert!(!p.is_match("src/kimi_cli/build.py"));

        let star = PathPattern::new("src/*auth*").unwrap();
        assert!(star.is_match("src/kimi_cli/oauth.py"));
    }

    #[test]
    fn invalid_and_empty_patterns() {
        assert!(matches!(PathPattern::new("  "), Err(ClassifyError::EmptyPattern)));
        assert!(matches!(
            PathPattern::new("src/[ui"),
            Err(ClassifyError::InvalidGlob { .. })
        ));
    }

    #[test]
    fn content_token_prefix() {
        let p = ContentPattern::new("auth").unwrap();
        assert!(p.is_match("from .auth import refresh"));
        assert!(p.is_match("    token = AUTHENTICATE(user)"));
        assert!(!p.is_match("oauth_client = None"));
        assert!(!p.is_match("__author__ = \"Moonshot\""));
        assert!(!p.is_match("AUTHORS = []"));
        assert!(!p.is_match("x = 1"));
    }

    #[test]
    fn content_punctuated_substring() {
        let p = ContentPattern::new("/login").unwrap();
        assert!(p.is_match("url = base + '/login'"));
    }
}
