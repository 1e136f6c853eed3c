//! Test-run records and per-file test parity.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The three test tiers tracked for every checklist entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestSuite {
    Unit,
    Integration,
    #[serde(rename = "e2e")]
    EndToEnd,
}

impl TestSuite {
    pub const ALL: [TestSuite; 3] = [TestSuite::Unit, TestSuite::Integration, TestSuite::EndToEnd];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestSuite::Unit => "unit",
            TestSuite::Integration => "integration",
            TestSuite::EndToEnd => "e2e",
        }
    }
}

impl fmt::Display for TestSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestSuite {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unit" => Ok(TestSuite::Unit),
            "integration" => Ok(TestSuite::Integration),
            "e2e" | "end-to-end" | "end_to_end" => Ok(TestSuite::EndToEnd),
            _ => Err(ParseError::UnknownValue {
                kind: "test suite",
                value: s.to_string(),
                expected: "unit, integration, e2e",
            }),
        }
    }
}

/// Result of a single test case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestResult {
    Passed,
    Failed,
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub name: String,
    pub result: TestResult,
}

impl TestOutcome {
    pub fn new(name: impl Into<String>, result: TestResult) -> Self {
        Self {
            name: name.into(),
            result,
        }
    }
}

/// One invocation of a suite with a name filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRun {
    pub suite: TestSuite,
    /// Name filter passed to the runner; empty means "all tests".
    pub filter: String,
    /// The command line that was executed.
    pub command: String,
    pub outcomes: Vec<TestOutcome>,
    pub recorded_at: DateTime<Utc>,
}

impl TestRun {
    fn count(&self, result: TestResult) -> usize {
        self.outcomes.iter().filter(|o| o.result == result).count()
    }

    pub fn passed(&self) -> usize {
        self.count(TestResult::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(TestResult::Failed)
    }

    pub fn ignored(&self) -> usize {
        self.count(TestResult::Ignored)
    }

    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.result == TestResult::Failed)
            .map(|o| o.name.as_str())
    }

    /// The parity this run establishes, or `None` if no test actually ran.
    pub fn parity(&self) -> Option<ParityStatus> {
        if self.failed() > 0 {
            Some(ParityStatus::Failed)
        } else if self.passed() > 0 {
            Some(ParityStatus::Passed)
        } else {
            None
        }
    }
}

/// Test status of one suite for one checklist entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParityStatus {
    #[default]
    NotRun,
    Passed,
    Failed,
}

impl ParityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParityStatus::NotRun => "not run",
            ParityStatus::Passed => "passed",
            ParityStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ParityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit, integration and end-to-end status for one entry. All three are
/// always present so none can be left implicit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestParity {
    pub unit: ParityStatus,
    pub integration: ParityStatus,
    pub e2e: ParityStatus,
}

impl TestParity {
    pub fn get(&self, suite: TestSuite) -> ParityStatus {
        match suite {
            TestSuite::Unit => self.unit,
            TestSuite::Integration => self.integration,
            TestSuite::EndToEnd => self.e2e,
        }
    }

    pub fn set(&mut self, suite: TestSuite, status: ParityStatus) {
        match suite {
            TestSuite::Unit => self.unit = status,
            TestSuite::Integration => self.integration = status,
            TestSuite::EndToEnd => self.e2e = status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(outcomes: Vec<TestOutcome>) -> TestRun {
        TestRun {
            suite: TestSuite::Unit,
            filter: "llm".into(),
            command: "cargo test --lib llm".into(),
            outcomes,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn parity_from_outcomes() {
        let ok = run(vec![TestOutcome::new("llm::a", TestResult::Passed)]);
        assert_eq!(ok.parity(), Some(ParityStatus::Passed));

        let bad = run(vec![
            TestOutcome::new("llm::a", TestResult::Passed),
            TestOutcome::new("llm::b", TestResult::Failed),
        ]);
        assert_eq!(bad.parity(), Some(ParityStatus::Failed));
        assert_eq!(bad.failures().collect::<Vec<_>>(), vec!["llm::b"]);

        let none = run(vec![TestOutcome::new("llm::c", TestResult::Ignored)]);
        assert_eq!(none.parity(), None);
    }

    #[test]
    fn parity_set_and_get() {
        let mut parity = TestParity::default();
        assert_eq!(parity.get(TestSuite::EndToEnd), ParityStatus::NotRun);
        parity.set(TestSuite::EndToEnd, ParityStatus::Passed);
        assert_eq!(parity.e2e, ParityStatus::Passed);
        assert_eq!(parity.get(TestSuite::Unit), ParityStatus::NotRun);
    }

    #[test]
    fn suite_names() {
        assert_eq!("end-to-end".parse::<TestSuite>().unwrap(), TestSuite::EndToEnd);
        assert_eq!(serde_json::to_string(&TestSuite::EndToEnd).unwrap(), "\"e2e\"");
    }
}
