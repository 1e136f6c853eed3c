//! [`RevisionSource`] backed by the `git` command-line tool.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use psync_diff::{ChangeKind, PathChange};
use tracing::debug;

use crate::error::{InventoryError, InventoryResult};
use crate::source::RevisionSource;

/// Runs `git` against a working tree or bare repository.
#[derive(Clone, Debug)]
pub struct GitCli {
    repo: PathBuf,
    program: String,
}

impl GitCli {
    /// Use the `git` found on `PATH` inside `repo`.
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            program: "git".to_string(),
        }
    }

    /// Use a specific git executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    fn output(&self, args: &[&str]) -> InventoryResult<Output> {
        debug!(repo = %self.repo.display(), "{} {}", self.program, args.join(" "));
        Command::new(&self.program)
            .arg("-C")
            .arg(&self.repo)
            .args(["-c", "core.quotepath=off"])
            .args(args)
            .output()
            .map_err(|source| InventoryError::Spawn {
                program: self.program.clone(),
                source,
            })
    }

    fn run(&self, args: &[&str]) -> InventoryResult<Vec<u8>> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(InventoryError::Command {
                command: format!("{} {}", self.program, args.join(" ")),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

impl RevisionSource for GitCli {
    fn resolve(&self, rev: &str) -> InventoryResult<String> {
        if rev.is_empty() || rev.starts_with('-') {
            return Err(InventoryError::RangeResolution {
                rev: rev.to_string(),
                reason: "not a revision name".into(),
            });
        }

        let revspec = format!("{rev}^{{commit}}");
        let output = self.output(&["rev-parse", "--verify", "--quiet", &revspec])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(InventoryError::RangeResolution {
                rev: rev.to_string(),
                reason: if stderr.is_empty() {
                    "unknown revision".into()
                } else {
                    stderr
                },
            });
        }

        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() {
            return Err(InventoryError::MalformedOutput(format!(
                "rev-parse printed nothing for {rev:?}"
            )));
        }
        Ok(id)
    }

    fn changed_paths(&self, base: &str, head: &str, root: &str) -> InventoryResult<Vec<PathChange>> {
        let mut args = vec!["diff", "--name-status", "-z", "-M", "--no-color", "--no-ext-diff", base, head];
        if !root.is_empty() {
            args.push("--");
            args.push(root);
        }
        let stdout = self.run(&args)?;
        parse_name_status(&stdout)
    }

    fn read_file(&self, rev: &str, path: &str) -> InventoryResult<Option<Vec<u8>>> {
        let revspec = format!("{rev}:{path}");
        let exists = self.output(&["cat-file", "-e", &revspec])?;
        if !exists.status.success() {
            return Ok(None);
        }
        self.run(&["show", "--no-textconv", &revspec]).map(Some)
    }
}

/// Parse the NUL-separated output of `git diff --name-status -z`.
///
/// Renames (`R<score>`) and copies (`C<score>`) carry two paths; a copy is
/// reported as an addition of the new path.
pub fn parse_name_status(output: &[u8]) -> InventoryResult<Vec<PathChange>> {
    let text = String::from_utf8_lossy(output);
    let mut fields = text.split('\0').filter(|f| !f.is_empty());
    let mut changes = Vec::new();

    while let Some(status) = fields.next() {
        let mut next_path = || {
            fields
                .next()
                .map(str::to_string)
                .ok_or_else(|| InventoryError::MalformedOutput(format!("missing path after status {status:?}")))
        };

        let change = match status.chars().next() {
            Some('A') => PathChange::new(next_path()?, ChangeKind::Added),
            Some('M') | Some('T') => PathChange::new(next_path()?, ChangeKind::Modified),
            Some('D') => PathChange::new(next_path()?, ChangeKind::Deleted),
            Some('R') => {
                let from = next_path()?;
                PathChange::new(next_path()?, ChangeKind::Renamed { from })
            }
            Some('C') => {
                let _source = next_path()?;
                PathChange::new(next_path()?, ChangeKind::Added)
            }
            _ => {
                return Err(InventoryError::MalformedOutput(format!(
                    "unexpected status {status:?}"
                )))
            }
        };
        changes.push(change);
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_statuses() {
        let out = b"M\0src/pkg/llm.py\0A\0src/pkg/new.py\0D\0src/pkg/gone.py\0";
        let changes = parse_name_status(out).unwrap();
        assert_eq!(
            changes,
            vec![
                PathChange::new("src/pkg/llm.py", ChangeKind::Modified),
                PathChange::new("src/pkg/new.py", ChangeKind::Added),
                PathChange::new("src/pkg/gone.py", ChangeKind::Deleted),
            ]
        );
    }

    #[test]
    fn parse_rename_and_copy() {
        let out = b"R087\0src/a.py\0src/b.py\0C100\0src/b.py\0src/c.py\0";
        let changes = parse_name_status(out).unwrap();
        assert_eq!(
            changes,
            vec![
                PathChange::new("src/b.py", ChangeKind::Renamed { from: "src/a.py".into() }),
                PathChange::new("src/c.py", ChangeKind::Added),
            ]
        );
    }

    #[test]
    fn parse_empty_output() {
        assert!(parse_name_status(b"").unwrap().is_empty());
    }

    #[test]
    fn parse_truncated_output_fails() {
        let err = parse_name_status(b"R100\0src/a.py\0").unwrap_err();
        assert!(matches!(err, InventoryError::MalformedOutput(_)));
    }

    #[test]
    fn parse_unknown_status_fails() {
        assert!(parse_name_status(b"U\0src/a.py\0").is_err());
    }

    #[test]
    fn resolve_rejects_option_like_names() {
        let git = GitCli::new(".");
        assert!(matches!(
            git.resolve("--all"),
            Err(InventoryError::RangeResolution { .. })
        ));
    }
}
