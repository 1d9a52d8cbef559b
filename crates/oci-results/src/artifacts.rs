//! Persisted run artifacts: one JSON file per run ID.

use crate::{ResultsError, ResultsResult, RunDataset};
use std::fs;
use std::path::{Path, PathBuf};

/// File layout: `<root>/run_<id>.json`, matching the artifact naming the
/// site's fetch layer expects.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Open without creating; for read-only consumers of a prebaked
    /// directory.
    pub fn open(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn run_path(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(format!("run_{run_id}.json"))
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_path(run_id).exists()
    }

    pub fn save_run(&self, run_id: &str, dataset: &RunDataset) -> ResultsResult<()> {
        let json = serde_json::to_string(dataset)?;
        fs::write(self.run_path(run_id), json)?;
        Ok(())
    }

    pub fn load_run(&self, run_id: &str) -> ResultsResult<RunDataset> {
        let path = self.run_path(run_id);
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        let dataset = serde_json::from_str(&content)?;
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oci_core::StageTriple;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        dir.push(format!("{}_{}", prefix, nanos));
        dir
    }

    #[test]
    fn save_load_roundtrip() {
        let store = ArtifactStore::new(unique_temp_dir("oci_artifacts")).unwrap();

        let mut dataset = RunDataset::new();
        dataset.insert(
            "F".to_string(),
            StageTriple {
                upstream: 1.0,
                midstream: 2.0,
                downstream: 3.0,
            },
        );

        assert!(!store.has_run("01"));
        store.save_run("01", &dataset).unwrap();
        assert!(store.has_run("01"));
        assert!(store.run_path("01").ends_with("run_01.json"));

        let loaded = store.load_run("01").unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn missing_artifact_is_run_not_found() {
        let store = ArtifactStore::open(unique_temp_dir("oci_artifacts_missing"));
        match store.load_run("00") {
            Err(ResultsError::RunNotFound { run_id }) => assert_eq!(run_id, "00"),
            other => panic!("expected RunNotFound, got {other:?}"),
        }
    }
}
