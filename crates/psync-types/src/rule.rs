//! Path rewrite rules: directory prefixes and file extensions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Rewrites a source-tree prefix into a target-tree prefix.
///
/// Rules are tried in order; the first whose `from` matches wins.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingRule {
    pub from: String,
    pub to: String,
}

impl MappingRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Rewrites a file suffix (`.py` to `.rs`) after a prefix rule applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtensionRule {
    pub from: String,
    pub to: String,
}

impl ExtensionRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

fn split_pair(s: &str) -> Result<(String, String), ParseError> {
    match s.split_once('=') {
        Some((from, to)) if !from.is_empty() => Ok((from.to_string(), to.to_string())),
        _ => Err(ParseError::InvalidRule(s.to_string())),
    }
}

impl FromStr for MappingRule {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = split_pair(s)?;
        Ok(Self { from, to })
    }
}

impl FromStr for ExtensionRule {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = split_pair(s)?;
        Ok(Self { from, to })
    }
}

impl fmt::Display for MappingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

impl fmt::Display for ExtensionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*{} -> *{}", self.from, self.to)
    }
}
