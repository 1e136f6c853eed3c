use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use psync_sdk::ConfigOverrides;
use psync_types::{ExtensionRule, MappingRule, SyncStatus, TestSuite, Verdict};

#[derive(Parser)]
#[command(
    name = "psync",
    about = "PortSync: mirror upstream changes from a source codebase into its port",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Config file (default: ./psync.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub sync: SyncArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Values that override the config file.
#[derive(Args)]
pub struct SyncArgs {
    /// Last synchronized revision
    #[arg(long, global = true)]
    pub base: Option<String>,
    /// Revision to sync up to
    #[arg(long, global = true)]
    pub head: Option<String>,
    /// Source subtree to inventory
    #[arg(long, global = true)]
    pub source_root: Option<String>,
    /// Source repository checkout
    #[arg(long, global = true)]
    pub repo: Option<PathBuf>,
    /// Path mapping rule FROM=TO (repeatable, tried in order)
    #[arg(long = "map", value_name = "FROM=TO", global = true)]
    pub map: Vec<MappingRule>,
    /// Extension rule FROM=TO, e.g. .py=.rs (repeatable)
    #[arg(long = "ext", value_name = "FROM=TO", global = true)]
    pub ext: Vec<ExtensionRule>,
    /// Exclude pattern (repeatable; replaces the configured list)
    #[arg(long = "exclude", value_name = "PATTERN", global = true)]
    pub exclude: Vec<String>,
}

impl SyncArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base: self.base.clone(),
            head: self.head.clone(),
            source_root: self.source_root.clone(),
            repo: self.repo.clone(),
            mapping_rules: self.map.clone(),
            extension_rules: self.ext.clone(),
            exclude_patterns: self.exclude.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List files changed in the revision range
    Inventory,
    /// Show where a source path maps in the target
    Map(MapArgs),
    /// Build the sync checklist for the revision range
    Plan(PlanArgs),
    /// Show the stored checklist
    Checklist,
    /// Set the status of a checklist entry
    Mark(MarkArgs),
    /// Decide the verdict of an ambiguous entry
    Resolve(ResolveArgs),
    /// Run a test suite in the target and record parity
    Test(TestArgs),
    /// Render the final sync report
    Report(ReportArgs),
}

#[derive(Args)]
pub struct MapArgs {
    pub path: String,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Replace an existing checklist
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct MarkArgs {
    pub path: String,
    /// pending, done, skipped or gap
    pub status: SyncStatus,
    /// Replace the entry's summary
    #[arg(long)]
    pub summary: Option<String>,
}

#[derive(Args)]
pub struct ResolveArgs {
    pub path: String,
    /// mirror or exclude
    pub verdict: Verdict,
}

#[derive(Args)]
pub struct TestArgs {
    /// unit, integration or e2e
    pub suite: TestSuite,
    /// Test name filter
    #[arg(long, default_value = "")]
    pub filter: String,
    /// Checklist entry covered by the run (repeatable; default: entries whose
    /// target name contains the filter)
    #[arg(long = "entry", value_name = "PATH")]
    pub entries: Vec<String>,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_overrides_and_subcommand() {
        let cli = Cli::try_parse_from([
            "psync",
            "--base",
            "v1",
            "--map",
            "src/kimi_cli/=rust/kagent/src/",
            "--ext",
            ".py=.rs",
            "mark",
            "src/kimi_cli/llm.py",
            "done",
            "--summary",
            "ported",
        ])
        .unwrap();
        let overrides = cli.sync.overrides();
        assert_eq!(overrides.base.as_deref(), Some("v1"));
        assert_eq!(
            overrides.mapping_rules,
            vec![MappingRule::new("src/kimi_cli/", "rust/kagent/src/")]
        );
        assert_eq!(overrides.extension_rules, vec![ExtensionRule::new(".py", ".rs")]);
        match cli.command {
            Command::Mark(args) => {
                assert_eq!(args.status, SyncStatus::Done);
                assert_eq!(args.summary.as_deref(), Some("ported"));
            }
            _ => panic!("expected mark"),
        }
    }

    #[test]
    fn parses_test_command() {
        let cli = Cli::try_parse_from([
            "psync", "test", "e2e", "--filter", "llm", "--entry", "a.py", "--entry", "b.py",
            "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Test(args) => {
                assert_eq!(args.suite, TestSuite::EndToEnd);
                assert_eq!(args.filter, "llm");
                assert_eq!(args.entries, vec!["a.py", "b.py"]);
            }
            _ => panic!("expected test"),
        }
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(Cli::try_parse_from(["psync", "--map", "no-equals", "inventory"]).is_err());
        assert!(Cli::try_parse_from(["psync", "mark", "a.py", "finished"]).is_err());
        assert!(Cli::try_parse_from(["psync", "resolve", "a.py", "maybe"]).is_err());
    }
}
