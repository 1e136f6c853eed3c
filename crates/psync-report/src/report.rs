//! The final sync report.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use psync_checklist::{Checklist, ChecklistEntry};
use psync_inventory::RevisionRange;
use psync_types::{ParityStatus, SyncStatus, TestRun, TestSuite, Verdict};
use serde::{Deserialize, Serialize};

use crate::table::{cell, code};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncedFile {
    pub file: String,
    pub target: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicItem {
    pub file: String,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub file: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub file: String,
    pub reasons: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapItem {
    pub file: String,
    pub target: Option<String>,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingItem {
    pub file: String,
    pub target: Option<String>,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunSummary {
    pub suite: TestSuite,
    pub filter: String,
    pub command: String,
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
    pub failures: Vec<String>,
}

impl From<&TestRun> for TestRunSummary {
    fn from(run: &TestRun) -> Self {
        Self {
            suite: run.suite,
            filter: run.filter.clone(),
            command: run.command.clone(),
            passed: run.passed(),
            failed: run.failed(),
            ignored: run.ignored(),
            failures: run.failures().map(str::to_string).collect(),
        }
    }
}

/// Test parity of one entry across all three suites.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParityRow {
    pub file: String,
    pub unit: ParityStatus,
    pub integration: ParityStatus,
    pub e2e: ParityStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub entries: usize,
    pub done: usize,
    pub skipped: usize,
    pub gap: usize,
    pub pending: usize,
}

/// The final report, partitioned by what happened to each entry.
///
/// Excluded files only ever appear under `skipped` (and in the parity table);
/// they never show up in a mirror section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub range: RevisionRange,
    pub base_id: String,
    pub head_id: String,
    pub generated_at: DateTime<Utc>,
    /// `true` when the range contained no changes under the source root.
    pub no_changes: bool,
    pub totals: Totals,
    pub files_synced: Vec<SyncedFile>,
    pub logic_synced: Vec<LogicItem>,
    pub skipped: Vec<SkippedItem>,
    pub needs_review: Vec<ReviewItem>,
    pub unmapped: Vec<String>,
    pub gaps: Vec<GapItem>,
    pub pending: Vec<PendingItem>,
    pub test_runs: Vec<TestRunSummary>,
    pub parity: Vec<ParityRow>,
}

impl Report {
    pub fn from_checklist(checklist: &Checklist) -> Self {
        let mut report = Self {
            range: checklist.range.clone(),
            base_id: checklist.base_id.clone(),
            head_id: checklist.head_id.clone(),
            generated_at: Utc::now(),
            no_changes: checklist.is_empty(),
            totals: Totals {
                entries: checklist.len(),
                done: checklist.count(SyncStatus::Done),
                skipped: checklist.count(SyncStatus::Skipped),
                gap: checklist.count(SyncStatus::Gap),
                pending: checklist.count(SyncStatus::Pending),
            },
            files_synced: Vec::new(),
            logic_synced: Vec::new(),
            skipped: Vec::new(),
            needs_review: Vec::new(),
            unmapped: Vec::new(),
            gaps: Vec::new(),
            pending: Vec::new(),
            test_runs: checklist.test_runs.iter().map(TestRunSummary::from).collect(),
            parity: Vec::new(),
        };

        for entry in &checklist.entries {
            report.parity.push(ParityRow {
                file: entry.file.clone(),
                unit: entry.tests.unit,
                integration: entry.tests.integration,
                e2e: entry.tests.e2e,
            });
            report.place(entry);
        }

        report
    }

    fn place(&mut self, entry: &ChecklistEntry) {
        // Unmapped entries stay listed whatever their status.
        if entry.is_unmapped() && !entry.is_excluded() {
            self.unmapped.push(entry.file.clone());
        }

        let Some(verdict) = entry.verdict else {
            self.needs_review.push(ReviewItem {
                file: entry.file.clone(),
                reasons: entry
                    .ambiguity
                    .as_ref()
                    .map(|a| a.reasons.clone())
                    .unwrap_or_default(),
            });
            return;
        };

        if verdict == Verdict::Exclude || entry.status == SyncStatus::Skipped {
            let reason = match (&entry.matched_pattern, verdict) {
                (Some(pattern), Verdict::Exclude) => format!("matched exclude pattern {pattern:?}"),
                (None, Verdict::Exclude) => "excluded by operator".to_string(),
                (_, Verdict::Mirror) => "skipped by operator".to_string(),
            };
            self.skipped.push(SkippedItem {
                file: entry.file.clone(),
                reason,
            });
            return;
        }

        match entry.status {
            SyncStatus::Done => {
                self.files_synced.push(SyncedFile {
                    file: entry.file.clone(),
                    target: entry.target.clone(),
                });
                self.logic_synced.push(LogicItem {
                    file: entry.file.clone(),
                    summary: entry.summary.clone(),
                });
            }
            SyncStatus::Gap => self.gaps.push(GapItem {
                file: entry.file.clone(),
                target: entry.target.clone(),
                summary: entry.summary.clone(),
            }),
            SyncStatus::Pending => self.pending.push(PendingItem {
                file: entry.file.clone(),
                target: entry.target.clone(),
                summary: entry.summary.clone(),
            }),
            SyncStatus::Skipped => {}
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render the report as markdown.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let r = &self.range;
        let root = if r.source_root.is_empty() { "." } else { r.source_root.as_str() };

        let _ = writeln!(out, "# Sync report: {}..{}", r.base, r.head);
        let _ = writeln!(out);
        let _ = writeln!(out, "- Base: `{}` ({})", r.base, self.base_id);
        let _ = writeln!(out, "- Head: `{}` ({})", r.head, self.head_id);
        let _ = writeln!(out, "- Source root: `{root}`");
        let _ = writeln!(out, "- Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        let t = &self.totals;
        let _ = writeln!(
            out,
            "- Progress: {} entries, {} done, {} skipped, {} gaps, {} pending",
            t.entries, t.done, t.skipped, t.gap, t.pending
        );
        let _ = writeln!(out);

        if self.no_changes {
            let _ = writeln!(out, "No changes in range.");
            let _ = writeln!(out);
        } else {
            section(&mut out, "Files synced", &self.files_synced, |f| match &f.target {
                Some(target) => format!("{} -> {}", code(&f.file), code(target)),
                None => code(&f.file),
            });
            section(&mut out, "Logic synced", &self.logic_synced, |l| {
                format!("{}: {}", code(&l.file), cell(&l.summary))
            });
            section(&mut out, "Skipped: UI/login changes", &self.skipped, |s| {
                format!("{} ({})", code(&s.file), s.reason)
            });
            section(&mut out, "Needs review (ambiguous classification)", &self.needs_review, |r| {
                if r.reasons.is_empty() {
                    code(&r.file)
                } else {
                    format!("{}: {}", code(&r.file), r.reasons.join("; "))
                }
            });
            section(&mut out, "Unmapped (add a mapping rule)", &self.unmapped, |f| code(f));
            section(&mut out, "Gaps", &self.gaps, |g| {
                let target = g.target.as_deref().map(code).unwrap_or_else(|| "(unmapped)".into());
                format!("{} -> {}: {}", code(&g.file), target, cell(&g.summary))
            });
            section(&mut out, "Pending", &self.pending, |p| {
                let target = p.target.as_deref().map(code).unwrap_or_else(|| "(unmapped)".into());
                format!("{} -> {}: {}", code(&p.file), target, cell(&p.summary))
            });
        }

        self.render_tests(&mut out);
        out
    }

    fn render_tests(&self, out: &mut String) {
        let _ = writeln!(out, "## Tests run ({})", self.test_runs.len());
        let _ = writeln!(out);
        if self.test_runs.is_empty() {
            let _ = writeln!(out, "_No test runs recorded._");
        }
        for run in &self.test_runs {
            let verdict = if run.failed > 0 { "FAILED" } else { "ok" };
            let _ = writeln!(
                out,
                "- {} {}: {verdict}, {} passed, {} failed, {} ignored",
                run.suite,
                code(&run.command),
                run.passed,
                run.failed,
                run.ignored
            );
            for failure in &run.failures {
                let _ = writeln!(out, "  - failed: {}", code(failure));
            }
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "### Test parity");
        let _ = writeln!(out);
        if self.parity.is_empty() {
            let _ = writeln!(out, "_No entries._");
            return;
        }
        let _ = writeln!(out, "| File | Unit | Integration | E2E |");
        let _ = writeln!(out, "|---|---|---|---|");
        for row in &self.parity {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                code(&row.file),
                row.unit,
                row.integration,
                row.e2e
            );
        }
    }
}

fn section<T>(out: &mut String, title: &str, items: &[T], line: impl Fn(&T) -> String) {
    let _ = writeln!(out, "## {title} ({})", items.len());
    let _ = writeln!(out);
    if items.is_empty() {
        let _ = writeln!(out, "_None._");
    }
    for item in items {
        let _ = writeln!(out, "- {}", line(item));
    }
    let _ = writeln!(out);
}
