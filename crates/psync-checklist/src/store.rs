//! On-disk persistence of a [`Checklist`].

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::checklist::Checklist;
use crate::error::{ChecklistError, ChecklistResult};

/// Default location, relative to the working directory.
pub const DEFAULT_CHECKLIST_PATH: &str = ".psync/checklist.json";

/// A checklist file on disk.
#[derive(Clone, Debug)]
pub struct ChecklistStore {
    path: PathBuf,
}

impl ChecklistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> ChecklistResult<Checklist> {
        if !self.exists() {
            return Err(ChecklistError::Missing(self.path.clone()));
        }
        let bytes = std::fs::read(&self.path)?;
        let checklist = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), "checklist loaded");
        Ok(checklist)
    }

    /// Write the checklist, replacing any existing file atomically.
    pub fn save(&self, checklist: &Checklist) -> ChecklistResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, checklist)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        debug!(path = %self.path.display(), entries = checklist.len(), "checklist saved");
        Ok(())
    }

    /// Write a new checklist, refusing to replace an existing one unless
    /// `overwrite` is set.
    pub fn create(&self, checklist: &Checklist, overwrite: bool) -> ChecklistResult<()> {
        if self.exists() && !overwrite {
            return Err(ChecklistError::AlreadyExists(self.path.clone()));
        }
        self.save(checklist)
    }
}

impl Default for ChecklistStore {
    fn default() -> Self {
        Self::new(DEFAULT_CHECKLIST_PATH)
    }
}
