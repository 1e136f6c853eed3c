//! Markdown checklist table.

use std::fmt::Write as _;

use psync_checklist::{Checklist, ChecklistEntry};

const HEADER: [&str; 9] = [
    "File",
    "Change",
    "Summary",
    "Target",
    "Verdict",
    "Status",
    "Unit",
    "Integration",
    "E2E",
];

/// Render the checklist as a markdown table, one row per entry, in
/// checklist order.
pub fn render_checklist_table(checklist: &Checklist) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| {} |", HEADER.join(" | "));
    let _ = writeln!(out, "|{}", "---|".repeat(HEADER.len()));

    for entry in &checklist.entries {
        let _ = writeln!(out, "| {} |", row(entry).join(" | "));
    }

    if checklist.is_empty() {
        let _ = writeln!(out, "\n_No changes in range._");
    }
    out
}

fn row(entry: &ChecklistEntry) -> Vec<String> {
    vec![
        code(&entry.file),
        entry.kind.label().to_string(),
        cell(&entry.summary),
        entry
            .target
            .as_deref()
            .map(code)
            .unwrap_or_else(|| "(unmapped)".to_string()),
        entry
            .verdict
            .map(|v| v.to_string())
            .unwrap_or_else(|| "needs review".to_string()),
        entry.status.to_string(),
        entry.tests.unit.to_string(),
        entry.tests.integration.to_string(),
        entry.tests.e2e.to_string(),
    ]
}

/// Escape a value for use inside a markdown table cell.
pub(crate) fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

pub(crate) fn code(value: &str) -> String {
    format!("`{}`", cell(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use psync_classify::Classification;
    use psync_checklist::Assessment;
    use psync_inventory::{Inventory, RevisionRange};
    use psync_mapping::MappingOutcome;
    use psync_types::{ChangeKind, ChangedFile, FileDiff, MappingRule, Verdict};

    fn checklist(paths: &[&str]) -> Checklist {
        let inventory = Inventory {
            range: RevisionRange::new("v1", "v2", "src"),
            base_id: "v1".into(),
            head_id: "v2".into(),
            files: paths
                .iter()
                .map(|p| ChangedFile::new(*p, ChangeKind::Modified, FileDiff::default()))
                .collect(),
            warning: None,
        };
        Checklist::build(&inventory, |file| Assessment {
            classification: Classification::Decided {
                verdict: Verdict::Mirror,
                matched_pattern: None,
            },
            target: if file.path.ends_with(".py") {
                MappingOutcome::Mapped {
                    target: file.path.replace("src/", "rust/"),
                    rule: MappingRule::new("src/", "rust/"),
                }
            } else {
                MappingOutcome::Unmapped
            },
            previous_target: None,
        })
    }

    #[test]
    fn one_row_per_entry() {
        let table = render_checklist_table(&checklist(&["src/a.py", "src/b.sh"]));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("| `src/a.py` | modified |"));
        assert!(lines[2].contains("`rust/a.py`"));
        assert!(lines[3].contains("(unmapped)"));
        assert!(lines[3].contains("| not run | not run | not run |"));
    }

    #[test]
    fn empty_checklist_says_so() {
        let table = render_checklist_table(&checklist(&[]));
        assert!(table.contains("No changes in range."));
    }

    #[test]
    fn pipes_are_escaped() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }
}
