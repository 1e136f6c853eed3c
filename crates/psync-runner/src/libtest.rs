//! Parsing of libtest (`cargo test`) console output.

use psync_types::{TestOutcome, TestResult};

/// Extract per-test results from `cargo test` output.
///
/// Recognizes lines of the form `test <name> ... ok|FAILED|ignored`, with an
/// optional trailing reason after `ignored`. Summary lines (`test result:`)
/// and doc-test headers are skipped.
pub fn parse_libtest_output(output: &str) -> Vec<TestOutcome> {
    output
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("test ")?;
            let (name, status) = rest.rsplit_once(" ... ")?;
            let result = match status.split_whitespace().next()? {
                "ok" => TestResult::Passed,
                "FAILED" => TestResult::Failed,
                "ignored" => TestResult::Ignored,
                _ => return None,
            };
            Some(TestOutcome::new(name.trim(), result))
        })
        .collect()
}
