use psync_classify::Classification;
use psync_inventory::{Inventory, InventoryWarning, RevisionRange};
use psync_mapping::MappingOutcome;
use psync_types::{ChangedFile, SyncStatus, TestRun, Verdict};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entry::ChecklistEntry;
use crate::error::{ChecklistError, ChecklistResult};

/// Current on-disk format version.
const CHECKLIST_VERSION: u32 = 1;

/// What the classifier and mapper decided about one changed file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assessment {
    pub classification: Classification,
    pub target: MappingOutcome,
    /// Mapping of the pre-rename path, for renames.
    pub previous_target: Option<MappingOutcome>,
}

/// All sync work for one revision range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub version: u32,
    pub range: RevisionRange,
    pub base_id: String,
    pub head_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<InventoryWarning>,
    pub entries: Vec<ChecklistEntry>,
    #[serde(default)]
    pub test_runs: Vec<TestRun>,
}

impl Checklist {
    /// Build one entry per inventoried file, in inventory order.
    pub fn build<F>(inventory: &Inventory, mut assess: F) -> Self
    where
        F: FnMut(&ChangedFile) -> Assessment,
    {
        let entries = inventory
            .files
            .iter()
            .map(|file| {
                let a = assess(file);
                ChecklistEntry::new(file, a.classification, a.target, a.previous_target)
            })
            .collect();

        Self {
            version: CHECKLIST_VERSION,
            range: inventory.range.clone(),
            base_id: inventory.base_id.clone(),
            head_id: inventory.head_id.clone(),
            warning: inventory.warning,
            entries,
            test_runs: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&ChecklistEntry> {
        self.entries.iter().find(|e| e.file == path)
    }

    fn get_mut(&mut self, path: &str) -> ChecklistResult<&mut ChecklistEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.file == path)
            .ok_or_else(|| ChecklistError::EntryNotFound(path.to_string()))
    }

    /// Number of entries in `status`.
    pub fn count(&self, status: SyncStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    pub fn needs_review(&self) -> impl Iterator<Item = &ChecklistEntry> {
        self.entries.iter().filter(|e| e.needs_review())
    }

    /// Entries no mapping rule covered, excluded ones aside.
    pub fn unmapped(&self) -> impl Iterator<Item = &ChecklistEntry> {
        self.entries
            .iter()
            .filter(|e| e.is_unmapped() && !e.is_excluded())
    }

    // ---------------------------------------------------------------
    // Status transitions
    // ---------------------------------------------------------------

    /// Move an entry to `status`, optionally replacing its summary.
    pub fn mark(
        &mut self,
        path: &str,
        status: SyncStatus,
        summary: Option<String>,
    ) -> ChecklistResult<&ChecklistEntry> {
        let entry = self.get_mut(path)?;

        if status != SyncStatus::Pending {
            match entry.verdict {
                None => {
                    return Err(ChecklistError::VerdictUndecided {
                        path: path.to_string(),
                        status,
                    })
                }
                Some(Verdict::Exclude)
                    if matches!(status, SyncStatus::Done | SyncStatus::Gap) =>
                {
                    return Err(ChecklistError::InvalidTransition {
                        path: path.to_string(),
                        status,
                        reason: "the file is excluded from mirroring".into(),
                    })
                }
                Some(_) => {}
            }
        }

        debug!(path, from = %entry.status, to = %status, "status transition");
        entry.status = status;
        if let Some(summary) = summary {
            entry.summary = summary;
        }
        Ok(&*entry)
    }

    /// Record an operator's verdict for an entry.
    ///
    /// Excluding a file moves it to `skipped`; mirroring a previously skipped
    /// file reopens it as `pending`.
    pub fn resolve(&mut self, path: &str, verdict: Verdict) -> ChecklistResult<&ChecklistEntry> {
        let entry = self.get_mut(path)?;
        entry.verdict = Some(verdict);
        entry.status = match (verdict, entry.status) {
            (Verdict::Exclude, _) => SyncStatus::Skipped,
            (Verdict::Mirror, SyncStatus::Skipped) => SyncStatus::Pending,
            (Verdict::Mirror, status) => status,
        };
        info!(path, verdict = %verdict, status = %entry.status, "verdict resolved by operator");
        Ok(&*entry)
    }

    // ---------------------------------------------------------------
    // Test parity
    // ---------------------------------------------------------------

    /// Store a test run and update the parity of the entries it covers.
    ///
    /// `paths` names the covered entries explicitly. When empty, the run
    /// covers mirrored, mapped entries whose target file stem contains the
    /// run's filter (every such entry when the filter is empty). Returns the
    /// covered paths. A run in which no test passed or failed leaves parity
    /// untouched.
    pub fn record_test_run(&mut self, run: TestRun, paths: &[String]) -> ChecklistResult<Vec<String>> {
        for path in paths {
            if self.get(path).is_none() {
                return Err(ChecklistError::EntryNotFound(path.clone()));
            }
        }

        let covered: Vec<String> = if paths.is_empty() {
            let filter = run.filter.to_lowercase();
            self.entries
                .iter()
                .filter(|e| e.is_mirrored())
                .filter(|e| {
                    e.target_stem()
                        .is_some_and(|stem| stem.to_lowercase().contains(&filter))
                })
                .map(|e| e.file.clone())
                .collect()
        } else {
            paths.to_vec()
        };

        if let Some(parity) = run.parity() {
            for entry in self.entries.iter_mut().filter(|e| covered.contains(&e.file)) {
                entry.tests.set(run.suite, parity);
            }
        }

        info!(
            suite = %run.suite,
            filter = %run.filter,
            passed = run.passed(),
            failed = run.failed(),
            covered = covered.len(),
            "test run recorded"
        );
        self.test_runs.push(run);
        Ok(covered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use psync_classify::AmbiguousClassification;
    use psync_types::{ChangeKind, FileDiff, MappingRule, ParityStatus, TestOutcome, TestResult, TestSuite};

    fn decided(verdict: Verdict) -> Classification {
        Classification::Decided {
            verdict,
            matched_pattern: None,
        }
    }

    fn inventory(paths: &[&str]) -> Inventory {
        Inventory {
            range: RevisionRange::new("v1", "v2", "src"),
            base_id: "v1".into(),
            head_id: "v2".into(),
            files: paths
                .iter()
                .map(|p| ChangedFile::new(*p, ChangeKind::Modified, FileDiff::default()))
                .collect(),
            warning: None,
        }
    }

    fn sample() -> Checklist {
        Checklist::build(
            &inventory(&["src/llm.py", "src/login.py", "src/session.py", "src/tool.py"]),
            |file| {
                let classification = match file.path.as_str() {
                    "src/login.py" => decided(Verdict::Exclude),
                    "src/session.py" => Classification::Ambiguous(AmbiguousClassification {
                        reasons: vec!["mentions auth".into()],
                    }),
                    _ => decided(Verdict::Mirror),
                };
                let target = if file.path == "src/tool.py" {
                    MappingOutcome::Unmapped
                } else {
                    MappingOutcome::Mapped {
                        target: file.path.replace("src/", "rust/").replace(".py", ".rs"),
                        rule: MappingRule::new("src/", "rust/"),
                    }
                };
                Assessment {
                    classification,
                    target,
                    previous_target: None,
                }
            },
        )
    }

    fn run(suite: TestSuite, filter: &str, results: &[TestResult]) -> TestRun {
        TestRun {
            suite,
            filter: filter.into(),
            command: format!("cargo test {filter}"),
            outcomes: results
                .iter()
                .enumerate()
                .map(|(i, r)| TestOutcome::new(format!("t{i}"), *r))
                .collect(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn one_entry_per_file_in_order() {
        let checklist = sample();
        let files: Vec<&str> = checklist.entries.iter().map(|e| e.file.as_str()).collect();
        assert_eq!(files, vec!["src/llm.py", "src/login.py", "src/session.py", "src/tool.py"]);
        assert_eq!(checklist.count(SyncStatus::Pending), 3);
        assert_eq!(checklist.count(SyncStatus::Skipped), 1);
        assert_eq!(checklist.needs_review().count(), 1);
        assert_eq!(checklist.unmapped().count(), 1);
    }

    #[test]
    fn mark_done_with_summary() {
        let mut checklist = sample();
        let entry = checklist
            .mark("src/llm.py", SyncStatus::Done, Some("ported retry logic".into()))
            .unwrap();
        assert_eq!(entry.status, SyncStatus::Done);
        assert_eq!(entry.summary, "ported retry logic");
    }

    #[test]
    fn ambiguous_entry_cannot_leave_pending() {
        let mut checklist = sample();
        let err = checklist
            .mark("src/session.py", SyncStatus::Done, None)
            .unwrap_err();
        assert!(matches!(err, ChecklistError::VerdictUndecided { .. }));
        assert!(checklist.mark("src/session.py", SyncStatus::Pending, None).is_ok());
    }

    #[test]
    fn excluded_entry_cannot_be_done() {
        let mut checklist = sample();
        let err = checklist.mark("src/login.py", SyncStatus::Done, None).unwrap_err();
        assert!(matches!(err, ChecklistError::InvalidTransition { .. }));
    }

    #[test]
    fn excluded_entry_cannot_be_gap() {
        let mut checklist = sample();
        let err = checklist.mark("src/login.py", SyncStatus::Gap, None).unwrap_err();
        assert!(matches!(err, ChecklistError::InvalidTransition { .. }));
        assert_eq!(checklist.get("src/login.py").unwrap().status, SyncStatus::Skipped);
        assert_eq!(checklist.count(SyncStatus::Gap), 0);

        let entry = checklist.mark("src/login.py", SyncStatus::Pending, None).unwrap();
        assert_eq!(entry.status, SyncStatus::Pending);
    }

    #[test]
    fn unknown_entry() {
        let mut checklist = sample();
        assert!(matches!(
            checklist.mark("src/nope.py", SyncStatus::Gap, None),
            Err(ChecklistError::EntryNotFound(_))
        ));
    }

    #[test]
    fn resolve_then_transition() {
        let mut checklist = sample();
        checklist.resolve("src/session.py", Verdict::Mirror).unwrap();
        let entry = checklist.mark("src/session.py", SyncStatus::Done, None).unwrap();
        assert_eq!(entry.status, SyncStatus::Done);
        assert!(entry.ambiguity.is_some());

        let entry = checklist.resolve("src/session.py", Verdict::Exclude).unwrap();
        assert_eq!(entry.status, SyncStatus::Skipped);

        let entry = checklist.resolve("src/session.py", Verdict::Mirror).unwrap();
        assert_eq!(entry.status, SyncStatus::Pending);
    }

    #[test]
    fn test_run_matches_entries_by_target_stem() {
        let mut checklist = sample();
        let covered = checklist
            .record_test_run(run(TestSuite::Unit, "llm", &[TestResult::Passed]), &[])
            .unwrap();
        assert_eq!(covered, vec!["src/llm.py".to_string()]);
        assert_eq!(checklist.get("src/llm.py").unwrap().tests.unit, ParityStatus::Passed);
        assert_eq!(checklist.get("src/llm.py").unwrap().tests.e2e, ParityStatus::NotRun);
        assert_eq!(checklist.test_runs.len(), 1);
    }

    #[test]
    fn test_run_with_explicit_entries_and_failure() {
        let mut checklist = sample();
        let covered = checklist
            .record_test_run(
                run(TestSuite::Integration, "", &[TestResult::Passed, TestResult::Failed]),
                &["src/tool.py".to_string()],
            )
            .unwrap();
        assert_eq!(covered.len(), 1);
        assert_eq!(
            checklist.get("src/tool.py").unwrap().tests.integration,
            ParityStatus::Failed
        );
    }

    #[test]
    fn test_run_naming_unknown_entry_fails() {
        let mut checklist = sample();
        let err = checklist
            .record_test_run(run(TestSuite::Unit, "", &[]), &["src/nope.py".to_string()])
            .unwrap_err();
        assert!(matches!(err, ChecklistError::EntryNotFound(_)));
        assert!(checklist.test_runs.is_empty());
    }

    #[test]
    fn run_without_results_leaves_parity() {
        let mut checklist = sample();
        checklist
            .record_test_run(run(TestSuite::Unit, "llm", &[TestResult::Ignored]), &[])
            .unwrap();
        assert_eq!(checklist.get("src/llm.py").unwrap().tests.unit, ParityStatus::NotRun);
    }
}
