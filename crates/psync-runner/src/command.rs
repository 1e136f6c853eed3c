use std::path::PathBuf;
use std::process::Command;

use chrono::Utc;
use psync_types::{TestOutcome, TestResult, TestRun, TestSuite};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{RunnerError, RunnerResult};
use crate::libtest::parse_libtest_output;
use crate::TestRunner;

/// Command line per suite, e.g. `cargo test --lib`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SuiteCommands {
    pub unit: Option<String>,
    pub integration: Option<String>,
    pub e2e: Option<String>,
}

impl SuiteCommands {
    pub fn get(&self, suite: TestSuite) -> Option<&str> {
        match suite {
            TestSuite::Unit => self.unit.as_deref(),
            TestSuite::Integration => self.integration.as_deref(),
            TestSuite::EndToEnd => self.e2e.as_deref(),
        }
    }
}

/// Runs configured shell-style command lines in the target codebase and
/// parses their libtest output.
#[derive(Clone, Debug)]
pub struct CommandTestRunner {
    commands: SuiteCommands,
    workdir: PathBuf,
}

impl CommandTestRunner {
    pub fn new(commands: SuiteCommands, workdir: impl Into<PathBuf>) -> Self {
        Self {
            commands,
            workdir: workdir.into(),
        }
    }

    /// The argument vector for `suite`, filter appended when non-empty.
    pub fn argv(&self, suite: TestSuite, filter: &str) -> RunnerResult<Vec<String>> {
        let line = self
            .commands
            .get(suite)
            .ok_or(RunnerError::NotConfigured(suite))?;
        let mut argv = shlex::split(line)
            .filter(|argv| !argv.is_empty())
            .ok_or_else(|| RunnerError::InvalidCommand(line.to_string()))?;
        if !filter.is_empty() {
            argv.push(filter.to_string());
        }
        Ok(argv)
    }
}

impl TestRunner for CommandTestRunner {
    fn run(&self, suite: TestSuite, filter: &str) -> RunnerResult<TestRun> {
        let argv = self.argv(suite, filter)?;
        let command = argv.join(" ");
        debug!(suite = %suite, workdir = %self.workdir.display(), "running {command}");

        let output = Command::new(&argv[0])
            .args(&argv[1..])
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| RunnerError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut outcomes = parse_libtest_output(&stdout);

        // A build failure prints no test lines; it must not read as a pass.
        if !output.status.success() && !outcomes.iter().any(|o| o.result == TestResult::Failed) {
            warn!(suite = %suite, status = %output.status, "test command failed without reporting a failing test");
            outcomes.push(TestOutcome::new(
                format!("{command} ({})", output.status),
                TestResult::Failed,
            ));
        }

        let run = TestRun {
            suite,
            filter: filter.to_string(),
            command,
            outcomes,
            recorded_at: Utc::now(),
        };
        info!(
            suite = %suite,
            passed = run.passed(),
            failed = run.failed(),
            ignored = run.ignored(),
            "test run finished"
        );
        Ok(run)
    }
}
