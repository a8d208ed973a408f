use std::fs;
use std::path::PathBuf;

use crate::config::StorageConfig;
use crate::eval::Experiment;

use super::error::StorageError;
use super::{ExperimentStore, ExperimentSummary};

/// File-based experiment storage.
///
/// ```text
/// .eli5/experiments/
///   {experiment-id}.json
/// ```
pub struct FileExperimentStore {
    dir: PathBuf,
}

impl FileExperimentStore {
    /// Creates a store rooted at the configured experiments directory.
    pub fn with_config(config: &StorageConfig) -> Self {
        Self {
            dir: config.experiments_path(),
        }
    }

    /// Returns the path of an experiment's file.
    fn experiment_file(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Ensures the experiments directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;
        }
        Ok(())
    }
}

impl ExperimentStore for FileExperimentStore {
    fn save_experiment(&self, experiment: &Experiment) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let path = self.experiment_file(&experiment.id);
        let json = serde_json::to_string_pretty(experiment)?;
        fs::write(&path, json).map_err(|e| StorageError::io(&path, e))?;

        tracing::debug!(path = %path.display(), "Saved experiment");
        Ok(())
    }

    fn load_experiment(&self, id: &str) -> Result<Experiment, StorageError> {
        let path = self.experiment_file(id);
        if !path.exists() {
            return Err(StorageError::ExperimentNotFound(id.to_string()));
        }

        let json = fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        Ok(serde_json::from_str(&json)?)
    }

    fn list_experiments(&self) -> Result<Vec<ExperimentSummary>, StorageError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        let entries = fs::read_dir(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&self.dir, e))?;
            let path = entry.path();

            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            if let Some(id) = path.file_stem().and_then(|n| n.to_str()) {
                match self.load_experiment(id) {
                    Ok(experiment) => summaries.push(ExperimentSummary::from(&experiment)),
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable experiment"),
                }
            }
        }

        summaries.sort_by(|a, b| b.started_at.cmp(&a.started_at));

        Ok(summaries)
    }
}
