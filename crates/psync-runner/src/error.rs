use psync_types::TestSuite;

/// Errors from running a test suite.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// No command is configured for the suite.
    #[error("no test command configured for the {0} suite")]
    NotConfigured(TestSuite),

    /// The configured command line could not be split into arguments.
    #[error("cannot parse test command {0:?}")]
    InvalidCommand(String),

    /// The test command could not be started.
    #[error("failed to start {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

pub type RunnerResult<T> = Result<T, RunnerError>;
