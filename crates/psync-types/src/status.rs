use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Whether a changed file should be ported to the target codebase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Port the change.
    Mirror,
    /// Intentionally not ported (UI, login, auth...).
    Exclude,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Mirror => "mirror",
            Verdict::Exclude => "exclude",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mirror" => Ok(Verdict::Mirror),
            "exclude" => Ok(Verdict::Exclude),
            _ => Err(ParseError::UnknownValue {
                kind: "verdict",
                value: s.to_string(),
                expected: "mirror, exclude",
            }),
        }
    }
}

/// Progress of one checklist entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Pending,
    /// Ported to the target.
    Done,
    /// Deliberately not ported.
    Skipped,
    /// Should be ported but could not be; needs follow-up.
    Gap,
}

impl SyncStatus {
    pub const ALL: [SyncStatus; 4] = [
        SyncStatus::Pending,
        SyncStatus::Done,
        SyncStatus::Skipped,
        SyncStatus::Gap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Done => "done",
            SyncStatus::Skipped => "skipped",
            SyncStatus::Gap => "gap",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SyncStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownValue {
                kind: "status",
                value: s.to_string(),
                expected: "pending, done, skipped, gap",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!("DONE".parse::<SyncStatus>().unwrap(), SyncStatus::Done);
        assert_eq!("gap".parse::<SyncStatus>().unwrap(), SyncStatus::Gap);
        assert!("finished".parse::<SyncStatus>().is_err());
    }

    #[test]
    fn verdict_parse() {
        assert_eq!("Mirror".parse::<Verdict>().unwrap(), Verdict::Mirror);
        assert!("maybe".parse::<Verdict>().is_err());
    }

    #[test]
    fn default_status_is_pending() {
        assert_eq!(SyncStatus::default(), SyncStatus::Pending);
    }
}
