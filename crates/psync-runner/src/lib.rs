//! Test execution for PortSync.
//!
//! The runner is a thin collaborator: it invokes the target codebase's test
//! command for a suite with a name filter and reports pass/fail per test. It
//! knows nothing about checklists; recording results is the caller's job.

pub mod command;
pub mod error;
pub mod libtest;

use psync_types::{TestRun, TestSuite};

pub use command::{CommandTestRunner, SuiteCommands};
pub use error::{RunnerError, RunnerResult};
pub use libtest::parse_libtest_output;

/// Runs one suite of the target's tests, restricted by a name filter.
pub trait TestRunner {
    /// Run `suite` with `filter` (empty for every test) and collect results.
    fn run(&self, suite: TestSuite, filter: &str) -> RunnerResult<TestRun>;
}
