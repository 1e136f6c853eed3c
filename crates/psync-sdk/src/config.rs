use std::path::{Path, PathBuf};

use psync_checklist::{ChecklistStore, DEFAULT_CHECKLIST_PATH};
use psync_classify::{Classifier, DEFAULT_CONTENT_PATTERNS, DEFAULT_EXCLUDE_PATTERNS};
use psync_inventory::{normalize_root, RevisionRange};
use psync_mapping::PathMapper;
use psync_runner::{CommandTestRunner, SuiteCommands};
use psync_types::{ExtensionRule, MappingRule};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "psync.toml";

/// Everything a sync run needs to know.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SyncConfig {
    /// Last synchronized revision.
    pub base: String,
    /// Revision to sync up to.
    pub head: String,
    /// Subtree of the source repository to inventory; empty for all of it.
    pub source_root: String,
    /// Source repository checkout.
    pub repo: PathBuf,
    /// Target codebase; test commands run here.
    pub target_root: PathBuf,
    pub checklist_path: PathBuf,
    pub exclude_patterns: Vec<String>,
    pub content_patterns: Vec<String>,
    pub mapping_rules: Vec<MappingRule>,
    pub extension_rules: Vec<ExtensionRule>,
    pub tests: SuiteCommands,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base: String::new(),
            head: "HEAD".into(),
            source_root: String::new(),
            repo: PathBuf::from("."),
            target_root: PathBuf::from("."),
            checklist_path: PathBuf::from(DEFAULT_CHECKLIST_PATH),
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            content_patterns: DEFAULT_CONTENT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            mapping_rules: Vec::new(),
            extension_rules: Vec::new(),
            tests: SuiteCommands::default(),
        }
    }
}

/// Command-line values layered over the config file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base: Option<String>,
    pub head: Option<String>,
    pub source_root: Option<String>,
    pub repo: Option<PathBuf>,
    /// Appended after the file's mapping rules, in order.
    pub mapping_rules: Vec<MappingRule>,
    /// Appended after the file's extension rules, in order.
    pub extension_rules: Vec<ExtensionRule>,
    /// Replaces the file's exclude patterns when non-empty.
    pub exclude_patterns: Vec<String>,
}

impl SyncConfig {
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SdkError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Self::from_toml_str(&text)
    }

    /// Load `path` if given, else `psync.toml` in `dir` if it exists, else
    /// the defaults.
    pub fn discover(path: Option<&Path>, dir: impl AsRef<Path>) -> SdkResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.as_ref().join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(base) = overrides.base {
            self.base = base;
        }
        if let Some(head) = overrides.head {
            self.head = head;
        }
        if let Some(root) = overrides.source_root {
            self.source_root = root;
        }
        if let Some(repo) = overrides.repo {
            self.repo = repo;
        }
        self.mapping_rules.extend(overrides.mapping_rules);
        self.extension_rules.extend(overrides.extension_rules);
        if !overrides.exclude_patterns.is_empty() {
            self.exclude_patterns = overrides.exclude_patterns;
        }
    }

    /// Check everything a pipeline run depends on.
    pub fn validate(&self) -> SdkResult<()> {
        if self.base.trim().is_empty() {
            return Err(SdkError::InvalidConfig(
                "no base revision (set `base` or pass --base)".into(),
            ));
        }
        if self.head.trim().is_empty() {
            return Err(SdkError::InvalidConfig("head revision is empty".into()));
        }
        normalize_root(&self.source_root)?;
        self.classifier()?;
        self.mapper()?;
        Ok(())
    }

    pub fn range(&self) -> RevisionRange {
        RevisionRange::new(&self.base, &self.head, &self.source_root)
    }

    pub fn classifier(&self) -> SdkResult<Classifier> {
        Ok(Classifier::new(&self.exclude_patterns, &self.content_patterns)?)
    }

    pub fn mapper(&self) -> SdkResult<PathMapper> {
        Ok(PathMapper::new(
            self.mapping_rules.clone(),
            self.extension_rules.clone(),
        )?)
    }

    pub fn checklist_store(&self) -> ChecklistStore {
        ChecklistStore::new(&self.checklist_path)
    }

    pub fn test_runner(&self) -> CommandTestRunner {
        CommandTestRunner::new(self.tests.clone(), &self.target_root)
    }
}
