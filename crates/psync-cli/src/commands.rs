use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use psync_checklist::{Checklist, ChecklistEntry};
use psync_inventory::Inventory;
use psync_report::{render_checklist_table, Report};
use psync_sdk::{run_tests, MappingOutcome, SyncConfig, SyncSession};
use psync_types::{ChangeKind, SyncStatus};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config =
        SyncConfig::discover(cli.config.as_deref(), ".").context("failed to load configuration")?;
    config.apply(cli.sync.overrides());
    let format = cli.format;

    match cli.command {
        Command::Inventory => cmd_inventory(config, format),
        Command::Map(args) => cmd_map(&config, args, format),
        Command::Plan(args) => cmd_plan(config, args, format),
        Command::Checklist => cmd_checklist(&config, format),
        Command::Mark(args) => cmd_mark(&config, args, format),
        Command::Resolve(args) => cmd_resolve(&config, args, format),
        Command::Test(args) => cmd_test(&config, args, format),
        Command::Report(args) => cmd_report(&config, args, format),
    }
}

fn cmd_inventory(config: SyncConfig, format: OutputFormat) -> anyhow::Result<()> {
    let session = SyncSession::open(config)?;
    let inventory = session.inventory()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&inventory)?),
        OutputFormat::Text => print_inventory(&inventory),
    }
    Ok(())
}

fn print_inventory(inventory: &Inventory) {
    println!(
        "Changes {}..{} ({} files)",
        inventory.range.base.yellow(),
        inventory.range.head.yellow(),
        inventory.len().to_string().bold()
    );
    if let Some(warning) = inventory.warning {
        println!("{} {}", "warning:".yellow().bold(), warning);
        return;
    }
    for file in &inventory.files {
        let tag = match &file.kind {
            ChangeKind::Added => "A".green(),
            ChangeKind::Modified => "M".yellow(),
            ChangeKind::Deleted => "D".red(),
            ChangeKind::Renamed { .. } => "R".cyan(),
        };
        let counts = if file.is_binary() {
            "binary".dimmed().to_string()
        } else {
            format!(
                "{} {}",
                format!("+{}", file.additions()).green(),
                format!("-{}", file.deletions()).red()
            )
        };
        match &file.kind {
            ChangeKind::Renamed { from } => {
                println!("  {tag} {} -> {}  {counts}", from.dimmed(), file.path)
            }
            _ => println!("  {tag} {}  {counts}", file.path),
        }
    }
}

fn cmd_map(config: &SyncConfig, args: MapArgs, format: OutputFormat) -> anyhow::Result<()> {
    let outcome = config.mapper()?.map(&args.path);
    let excluded_by = config.classifier()?.matching_pattern(&args.path).map(str::to_string);

    if format == OutputFormat::Json {
        let value = serde_json::json!({
            "path": args.path,
            "mapping": outcome,
            "exclude_pattern": excluded_by,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match &outcome {
        MappingOutcome::Mapped { target, rule } => {
            println!("{} -> {}  ({})", args.path, target.green(), rule.to_string().dimmed())
        }
        MappingOutcome::Unmapped => {
            println!("{} -> {}", args.path, "unmapped".red().bold())
        }
    }
    if let Some(pattern) = excluded_by {
        println!("  {} matches exclude pattern {pattern:?}", "note:".yellow());
    }
    Ok(())
}

fn cmd_plan(config: SyncConfig, args: PlanArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = config.checklist_store();
    let session = SyncSession::open(config)?;
    let checklist = session.plan()?;
    store
        .create(&checklist, args.force)
        .context("cannot write checklist (use --force to replace it)")?;

    print_checklist(&checklist, format)?;
    if format == OutputFormat::Text {
        println!(
            "{} Wrote {} entries to {}",
            "✓".green().bold(),
            checklist.len(),
            store.path().display().to_string().bold()
        );
        let review = checklist.needs_review().count();
        if review > 0 {
            println!("  {} {review} entries need review (`psync resolve`)", "!".yellow().bold());
        }
        let unmapped = checklist.unmapped().count();
        if unmapped > 0 {
            println!("  {} {unmapped} entries have no mapping rule", "!".yellow().bold());
        }
    }
    Ok(())
}

fn cmd_checklist(config: &SyncConfig, format: OutputFormat) -> anyhow::Result<()> {
    let checklist = config.checklist_store().load()?;
    print_checklist(&checklist, format)
}

fn cmd_mark(config: &SyncConfig, args: MarkArgs, format: OutputFormat) -> anyhow::Result<()> {
    update_entry(config, format, |checklist| {
        checklist.mark(&args.path, args.status, args.summary.clone())
    })
}

fn cmd_resolve(config: &SyncConfig, args: ResolveArgs, format: OutputFormat) -> anyhow::Result<()> {
    update_entry(config, format, |checklist| checklist.resolve(&args.path, args.verdict))
}

fn update_entry<F>(config: &SyncConfig, format: OutputFormat, apply: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Checklist) -> psync_checklist::ChecklistResult<&ChecklistEntry>,
{
    let store = config.checklist_store();
    let mut checklist = store.load()?;
    let entry = apply(&mut checklist)?.clone();
    store.save(&checklist)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
        OutputFormat::Text => {
            let verdict = entry
                .verdict
                .map(|v| v.to_string())
                .unwrap_or_else(|| "needs review".into());
            println!(
                "{} {}: {} ({})",
                "✓".green().bold(),
                entry.file,
                status_label(entry.status),
                verdict
            );
        }
    }
    Ok(())
}

fn cmd_test(config: &SyncConfig, args: TestArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = config.checklist_store();
    let mut checklist = store.load()?;
    let runner = config.test_runner();
    let (run, covered) = run_tests(&mut checklist, &runner, args.suite, &args.filter, &args.entries)?;
    store.save(&checklist)?;

    if format == OutputFormat::Json {
        let value = serde_json::json!({ "run": run, "covered": covered });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let verdict = if run.failed() > 0 {
        "FAILED".red().bold()
    } else {
        "ok".green().bold()
    };
    println!(
        "{} {}: {verdict}. {} passed; {} failed; {} ignored",
        run.suite.to_string().bold(),
        run.command.dimmed(),
        run.passed(),
        run.failed(),
        run.ignored()
    );
    for name in run.failures() {
        println!("  {} {name}", "failed:".red());
    }
    if covered.is_empty() {
        println!("  no checklist entries matched; pass --entry to record parity");
    }
    for path in &covered {
        println!("  recorded for {path}");
    }
    Ok(())
}

fn cmd_report(config: &SyncConfig, args: ReportArgs, format: OutputFormat) -> anyhow::Result<()> {
    let checklist = config.checklist_store().load()?;
    let report = Report::from_checklist(&checklist);
    let rendered = match format {
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Text => report.render_text(),
    };

    match args.output {
        Some(path) => {
            write_output(&path, &rendered)?;
            println!("{} Report written to {}", "✓".green().bold(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create {}", dir.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("cannot write {}", path.display()))
}

fn print_checklist(checklist: &Checklist, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(checklist)?),
        OutputFormat::Text => {
            if let Some(warning) = checklist.warning {
                println!("{} {}", "warning:".yellow().bold(), warning);
            }
            print!("{}", render_checklist_table(checklist));
            println!(
                "{} done, {} skipped, {} gaps, {} pending",
                checklist.count(SyncStatus::Done).to_string().green(),
                checklist.count(SyncStatus::Skipped).to_string().dimmed(),
                checklist.count(SyncStatus::Gap).to_string().red(),
                checklist.count(SyncStatus::Pending).to_string().yellow()
            );
        }
    }
    Ok(())
}

fn status_label(status: SyncStatus) -> colored::ColoredString {
    match status {
        SyncStatus::Done => status.as_str().green(),
        SyncStatus::Skipped => status.as_str().dimmed(),
        SyncStatus::Gap => status.as_str().red(),
        SyncStatus::Pending => status.as_str().yellow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.md");
        write_output(&path, "# Sync report\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Sync report\n");
    }
}
