use psync_classify::{AmbiguousClassification, Classification};
use psync_mapping::MappingOutcome;
use psync_types::{ChangeKind, ChangedFile, SyncStatus, TestParity, Verdict};
use serde::{Deserialize, Serialize};

/// A tracked unit of sync work for one changed source file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    /// Source path (head side for renames).
    pub file: String,
    pub kind: ChangeKind,
    /// What changed; generated from the diff, replaceable by the operator.
    pub summary: String,
    /// Expected target path, or `None` if no mapping rule covers the file.
    pub target: Option<String>,
    /// Target path of the pre-rename source path, for renames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_target: Option<String>,
    /// `None` while the classification is ambiguous.
    pub verdict: Option<Verdict>,
    /// Exclude pattern behind an automatic `exclude` verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
    /// Why the classifier refused to decide. Kept after an operator resolves
    /// the entry so the report can show what was reviewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambiguity: Option<AmbiguousClassification>,
    pub status: SyncStatus,
    #[serde(default)]
    pub tests: TestParity,
}

impl ChecklistEntry {
    /// Create the entry for `file`. Excluded files start out `skipped`; all
    /// others start `pending`.
    pub fn new(
        file: &ChangedFile,
        classification: Classification,
        target: MappingOutcome,
        previous_target: Option<MappingOutcome>,
    ) -> Self {
        let (verdict, matched_pattern, ambiguity) = match classification {
            Classification::Decided {
                verdict,
                matched_pattern,
            } => (Some(verdict), matched_pattern, None),
            Classification::Ambiguous(amb) => (None, None, Some(amb)),
        };
        let status = match verdict {
            Some(Verdict::Exclude) => SyncStatus::Skipped,
            _ => SyncStatus::Pending,
        };

        Self {
            file: file.path.clone(),
            kind: file.kind.clone(),
            summary: file.summary(),
            target: target.target().map(str::to_string),
            previous_target: previous_target.and_then(|o| o.target().map(str::to_string)),
            verdict,
            matched_pattern,
            ambiguity,
            status,
            tests: TestParity::default(),
        }
    }

    /// No mapping rule covered the file.
    pub fn is_unmapped(&self) -> bool {
        self.target.is_none()
    }

    /// Still waiting for an operator to pick a verdict.
    pub fn needs_review(&self) -> bool {
        self.verdict.is_none()
    }

    pub fn is_mirrored(&self) -> bool {
        self.verdict == Some(Verdict::Mirror)
    }

    pub fn is_excluded(&self) -> bool {
        self.verdict == Some(Verdict::Exclude)
    }

    /// File name of the target without its extension, used to associate
    /// test filters with entries.
    pub fn target_stem(&self) -> Option<&str> {
        let target = self.target.as_deref()?;
        let name = target.rsplit('/').next().unwrap_or(target);
        Some(match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        })
    }
}
