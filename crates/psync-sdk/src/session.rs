use psync_checklist::{Assessment, Checklist, ChecklistError};
use psync_classify::{Classification, Classifier};
use psync_inventory::{ChangeInventory, GitCli, Inventory, RevisionSource};
use psync_mapping::{MappingOutcome, PathMapper};
use psync_runner::TestRunner;
use psync_types::{ChangedFile, TestRun, TestSuite, Verdict};
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::error::SdkResult;

/// One sync pipeline over a revision source.
///
/// Building the session validates the configuration; after that, per-file
/// problems (ambiguous verdicts, unmapped paths) are recorded on the
/// checklist and never fail the run.
pub struct SyncSession {
    config: SyncConfig,
    classifier: Classifier,
    mapper: PathMapper,
    source: Box<dyn RevisionSource>,
}

impl SyncSession {
    pub fn new(config: SyncConfig, source: impl RevisionSource + 'static) -> SdkResult<Self> {
        config.validate()?;
        Ok(Self {
            classifier: config.classifier()?,
            mapper: config.mapper()?,
            config,
            source: Box::new(source),
        })
    }

    /// A session over the git repository named by `config.repo`.
    pub fn open(config: SyncConfig) -> SdkResult<Self> {
        let git = GitCli::new(&config.repo);
        Self::new(config, git)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn mapper(&self) -> &PathMapper {
        &self.mapper
    }

    pub fn inventory(&self) -> SdkResult<Inventory> {
        Ok(ChangeInventory::new(self.source.as_ref()).collect(&self.config.range())?)
    }

    pub fn map(&self, path: &str) -> MappingOutcome {
        self.mapper.map(path)
    }

    /// Classify and map one changed file.
    pub fn assess(&self, file: &ChangedFile) -> Assessment {
        let classification = self.classifier.classify(file);
        let target = self.mapper.map(&file.path);
        let previous_target = file.kind.previous_path().map(|from| self.mapper.map(from));

        if let Classification::Ambiguous(amb) = &classification {
            warn!(path = %file.path, "{amb}");
        }
        if target.is_unmapped() && classification.verdict() != Some(Verdict::Exclude) {
            warn!(path = %file.path, "no mapping rule covers this file");
        }

        Assessment {
            classification,
            target,
            previous_target,
        }
    }

    /// Run the whole pipeline and build a fresh checklist.
    pub fn plan(&self) -> SdkResult<Checklist> {
        let inventory = self.inventory()?;
        let checklist = Checklist::build(&inventory, |file| self.assess(file));
        info!(
            entries = checklist.len(),
            needs_review = checklist.needs_review().count(),
            unmapped = checklist.unmapped().count(),
            "checklist built"
        );
        Ok(checklist)
    }
}

/// Run `suite` through `runner` and record the result on `checklist`.
///
/// Named entries are checked before anything runs. Returns the run and the
/// entries it covered.
pub fn run_tests(
    checklist: &mut Checklist,
    runner: &dyn TestRunner,
    suite: TestSuite,
    filter: &str,
    entries: &[String],
) -> SdkResult<(TestRun, Vec<String>)> {
    for path in entries {
        if checklist.get(path).is_none() {
            return Err(ChecklistError::EntryNotFound(path.clone()).into());
        }
    }
    let run = runner.run(suite, filter)?;
    let covered = checklist.record_test_run(run.clone(), entries)?;
    Ok((run, covered))
}
