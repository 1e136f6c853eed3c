//! Content-level diff: line-by-line comparison of one file across two revisions.
//!
//! Uses the `similar` crate (Myers diff algorithm) to produce structured
//! hunks with three lines of context, the same shape `git diff` prints.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Lines of unchanged context kept around each change.
const CONTEXT_LINES: usize = 3;

/// The result of diffing the base and head contents of a single file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    /// The diff hunks, in file order.
    pub hunks: Vec<Hunk>,
    /// `true` when either side is not valid UTF-8 text.
    #[serde(default)]
    pub binary: bool,
}

impl FileDiff {
    /// Returns `true` if both sides are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Total number of lines added across all hunks.
    pub fn additions(&self) -> usize {
        self.hunks.iter().map(Hunk::additions).sum()
    }

    /// Total number of lines removed across all hunks.
    pub fn deletions(&self) -> usize {
        self.hunks.iter().map(Hunk::deletions).sum()
    }

    /// Render the hunks as unified-diff text (without file headers).
    pub fn to_unified(&self) -> String {
        let mut out = String::new();
        for hunk in &self.hunks {
            out.push_str(&hunk.to_unified());
        }
        out
    }
}

/// A contiguous region of changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Line in the base content where this hunk starts (1-based).
    pub old_start: usize,
    /// Number of base lines covered by this hunk.
    pub old_count: usize,
    /// Line in the head content where this hunk starts (1-based).
    pub new_start: usize,
    /// Number of head lines covered by this hunk.
    pub new_count: usize,
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    pub fn additions(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, HunkLine::Added(_)))
            .count()
    }

    pub fn deletions(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, HunkLine::Removed(_)))
            .count()
    }

    /// Lines that were added or removed, skipping context.
    pub fn changed_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|l| match l {
            HunkLine::Added(text) | HunkLine::Removed(text) => Some(text.as_str()),
            HunkLine::Context(_) => None,
        })
    }

    /// Render this hunk as unified-diff text, header included.
    pub fn to_unified(&self) -> String {
        let mut out = format!(
            "@@ -{},{} +{},{} @@\n",
            self.old_start, self.old_count, self.new_start, self.new_count
        );
        for line in &self.lines {
            let (prefix, text) = match line {
                HunkLine::Context(t) => (' ', t),
                HunkLine::Added(t) => ('+', t),
                HunkLine::Removed(t) => ('-', t),
            };
            let _ = writeln!(out, "{prefix}{text}");
        }
        out
    }
}

/// A single line in a hunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "text", rename_all = "snake_case")]
pub enum HunkLine {
    /// Present on both sides.
    Context(String),
    /// Present only in the head content.
    Added(String),
    /// Present only in the base content.
    Removed(String),
}

/// Compute the line diff of one file between two revisions.
///
/// `None` stands for "file absent at that revision", so an added file diffs
/// against empty content and a deleted file diffs to empty content. If either
/// side is not valid UTF-8, a single synthetic hunk describing the size change
/// is returned and [`FileDiff::binary`] is set.
pub fn diff_contents(old: Option<&[u8]>, new: Option<&[u8]>) -> FileDiff {
    let old = old.unwrap_or_default();
    let new = new.unwrap_or_default();

    let (old_str, new_str) = match (std::str::from_utf8(old), std::str::from_utf8(new)) {
        (Ok(o), Ok(n)) if !o.contains('\0') && !n.contains('\0') => (o, n),
        _ => return binary_diff(old, new),
    };

    if old_str == new_str {
        return FileDiff::default();
    }

    let text_diff = TextDiff::from_lines(old_str, new_str);
    let mut hunks = Vec::new();

    for group in text_diff.grouped_ops(CONTEXT_LINES) {
        let Some(first) = group.first() else {
            continue;
        };
        let mut hunk = Hunk {
            old_start: first.old_range().start + 1,
            old_count: 0,
            new_start: first.new_range().start + 1,
            new_count: 0,
            lines: Vec::new(),
        };

        for op in &group {
            for change in text_diff.iter_changes(op) {
                let text = change.value().trim_end_matches(['\n', '\r']).to_string();
                match change.tag() {
                    ChangeTag::Equal => {
                        hunk.lines.push(HunkLine::Context(text));
                        hunk.old_count += 1;
                        hunk.new_count += 1;
                    }
                    ChangeTag::Delete => {
                        hunk.lines.push(HunkLine::Removed(text));
                        hunk.old_count += 1;
                    }
                    ChangeTag::Insert => {
                        hunk.lines.push(HunkLine::Added(text));
                        hunk.new_count += 1;
                    }
                }
            }
        }

        hunks.push(hunk);
    }

    FileDiff {
        hunks,
        binary: false,
    }
}

fn binary_diff(old: &[u8], new: &[u8]) -> FileDiff {
    if old == new {
        return FileDiff {
            hunks: Vec::new(),
            binary: true,
        };
    }

    let mut lines = Vec::new();
    if !old.is_empty() {
        lines.push(HunkLine::Removed(format!("(binary content, {} bytes)", old.len())));
    }
    if !new.is_empty() {
        lines.push(HunkLine::Added(format!("(binary content, {} bytes)", new.len())));
    }

    FileDiff {
        hunks: vec![Hunk {
            old_start: 1,
            old_count: usize::from(!old.is_empty()),
            new_start: 1,
            new_count: usize::from(!new.is_empty()),
            lines,
        }],
        binary: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_contents_no_hunks() {
        let content = b"hello\nworld\n";
        let diff = diff_contents(Some(content), Some(content));
        assert!(diff.is_empty());
        assert!(!diff.binary);
    }

    #[test]
    fn added_file_is_all_additions() {
        let diff = diff_contents(None, Some(b"a\nb\nc\n"));
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(diff.additions(), 3);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn deleted_file_is_all_deletions() {
        let diff = diff_contents(Some(b"a\nb\n"), None);
        assert_eq!(diff.additions(), 0);
        assert_eq!(diff.deletions(), 2);
    }

    #[test]
    fn modification_shows_remove_and_add() {
        let diff = diff_contents(Some(b"hello world\n"), Some(b"hello universe\n"));
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
    }

    #[test]
    fn hunk_carries_context_and_line_numbers() {
        let old = b"a\nb\nc\nd\ne\nf\ng\nh\ni\nj\n";
        let new = b"a\nb\nc\nd\nX\nf\ng\nh\ni\nj\n";

        let diff = diff_contents(Some(old), Some(new));
        assert_eq!(diff.hunks.len(), 1);

        let hunk = &diff.hunks[0];
        assert_eq!(hunk.old_start, 2);
        assert_eq!(hunk.new_start, 2);
        assert_eq!(hunk.old_count, 7);
        assert_eq!(hunk.new_count, 7);
        assert!(hunk.lines.iter().any(|l| matches!(l, HunkLine::Context(_))));
    }

    #[test]
    fn distant_changes_split_into_hunks() {
        let old: String = (1..=30).map(|i| format!("line{i}\n")).collect();
        let new = old.replace("line2\n", "two\n").replace("line28\n", "twenty-eight\n");

        let diff = diff_contents(Some(old.as_bytes()), Some(new.as_bytes()));
        assert_eq!(diff.hunks.len(), 2);
    }

    #[test]
    fn changed_lines_skip_context() {
        let diff = diff_contents(Some(b"keep\nold\n"), Some(b"keep\nnew\n"));
        let changed: Vec<&str> = diff.hunks[0].changed_lines().collect();
        assert_eq!(changed, vec!["old", "new"]);
    }

    #[test]
    fn binary_content_detection() {
        let old = [0u8, 1, 2, 3, 0xFF, 0xFE];
        let new = [4u8, 5, 6, 0xFF, 0xFE, 0xFD];

        let diff = diff_contents(Some(&old), Some(&new));
        assert!(diff.binary);
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
    }

    #[test]
    fn unified_rendering() {
        let diff = diff_contents(Some(b"a\nb\n"), Some(b"a\nc\n"));
        assert_eq!(diff.to_unified(), "@@ -1,2 +1,2 @@\n a\n-b\n+c\n");
    }

    #[test]
    fn serde_line_shape() {
        let json = serde_json::to_string(&HunkLine::Added("x".into())).unwrap();
        assert_eq!(json, r#"{"op":"added","text":"x"}"#);
    }
}
