use serde::{Deserialize, Serialize};

use psync_diff::{ChangeKind, FileDiff, Hunk};

/// One file that changed in the inventoried range.
///
/// Produced once per inventory run and never mutated afterwards; the
/// checklist keeps its own derived copy of the fields it tracks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Repository-relative path at the head revision (`/`-separated).
    /// For deletions, the path the file had at the base revision.
    pub path: String,
    pub kind: ChangeKind,
    pub diff: FileDiff,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, kind: ChangeKind, diff: FileDiff) -> Self {
        Self {
            path: path.into(),
            kind,
            diff,
        }
    }

    pub fn hunks(&self) -> &[Hunk] {
        &self.diff.hunks
    }

    pub fn additions(&self) -> usize {
        self.diff.additions()
    }

    pub fn deletions(&self) -> usize {
        self.diff.deletions()
    }

    pub fn is_binary(&self) -> bool {
        self.diff.binary
    }

    /// Added and removed lines across every hunk, context excluded.
    pub fn changed_lines(&self) -> impl Iterator<Item = &str> {
        self.diff.hunks.iter().flat_map(Hunk::changed_lines)
    }

    /// One-line description: `modified, +3 -1 in 2 hunks`.
    pub fn summary(&self) -> String {
        let kind = match &self.kind {
            ChangeKind::Renamed { from } => format!("renamed from {from}"),
            other => other.label().to_string(),
        };
        if self.is_binary() {
            return format!("{kind}, binary");
        }
        let hunks = self.hunks().len();
        let noun = if hunks == 1 { "hunk" } else { "hunks" };
        format!(
            "{kind}, +{} -{} in {hunks} {noun}",
            self.additions(),
            self.deletions()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psync_diff::diff_contents;

    #[test]
    fn summary_counts_lines_and_hunks() {
        let diff = diff_contents(Some(b"a\nb\n"), Some(b"a\nc\nd\n"));
        let file = ChangedFile::new("src/pkg/llm.py", ChangeKind::Modified, diff);
        assert_eq!(file.summary(), "modified, +2 -1 in 1 hunk");
    }

    #[test]
    fn summary_mentions_rename_source() {
        let file = ChangedFile::new(
            "src/pkg/new.py",
            ChangeKind::Renamed {
                from: "src/pkg/old.py".into(),
            },
            FileDiff::default(),
        );
        assert_eq!(file.summary(), "renamed from src/pkg/old.py, +0 -0 in 0 hunks");
    }

    #[test]
    fn changed_lines_flatten_hunks() {
        let diff = diff_contents(None, Some(b"import auth\nx = 1\n"));
        let file = ChangedFile::new("a.py", ChangeKind::Added, diff);
        assert_eq!(file.changed_lines().count(), 2);
    }
}
