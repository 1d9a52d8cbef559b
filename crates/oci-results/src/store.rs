//! The memoizing run store.
//!
//! `get` is the single entry point for run datasets: validate the ID, consult
//! the in-memory memo, then load the persisted artifact or materialize from
//! inputs — exactly once per run ID for the life of the store. Datasets are
//! immutable after insertion and shared as `Arc`s, so concurrent reads need
//! no further locking.

use crate::artifacts::ArtifactStore;
use crate::{ResultsResult, RunDataset, RunId, lock_unpoisoned};
use oci_data::{Catalog, DeltaTables, FieldTable};
use oci_model::{materialize_run, validate_run_id};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Per-key slot. Holding the slot's lock while producing the dataset gives
/// the single-flight guarantee: concurrent misses for the same ID coalesce
/// into one materialization.
type Slot = Arc<Mutex<Option<Arc<RunDataset>>>>;

enum RunSource {
    /// Derive on miss, optionally preferring a prebaked artifact.
    Inputs {
        fields: Arc<FieldTable>,
        deltas: Arc<DeltaTables>,
        artifacts: Option<ArtifactStore>,
    },
    /// Prebaked artifacts only; a valid ID with no file is `RunNotFound`.
    ArtifactsOnly(ArtifactStore),
}

pub struct RunStore {
    catalog: Arc<Catalog>,
    source: RunSource,
    memo: Mutex<HashMap<RunId, Slot>>,
}

impl RunStore {
    /// Store that can always derive a dataset, preferring a prebaked artifact
    /// when one exists.
    pub fn with_inputs(
        catalog: Arc<Catalog>,
        fields: Arc<FieldTable>,
        deltas: Arc<DeltaTables>,
        artifacts: Option<ArtifactStore>,
    ) -> Self {
        Self {
            catalog,
            source: RunSource::Inputs {
                fields,
                deltas,
                artifacts,
            },
            memo: Mutex::new(HashMap::new()),
        }
    }

    /// Store over a prebaked artifact directory, with no derivation inputs.
    pub fn artifacts_only(catalog: Arc<Catalog>, artifacts: ArtifactStore) -> Self {
        Self {
            catalog,
            source: RunSource::ArtifactsOnly(artifacts),
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Fetch the dataset for a run ID, memoizing on first use.
    ///
    /// Malformed IDs are rejected here; the all-default fallback is caller
    /// policy, not the store's.
    pub fn get(&self, run_id: &str) -> ResultsResult<Arc<RunDataset>> {
        validate_run_id(&self.catalog, run_id)?;

        let slot = {
            let mut memo = lock_unpoisoned(&self.memo);
            memo.entry(run_id.to_string()).or_default().clone()
        };

        let mut guard = lock_unpoisoned(&slot);
        if let Some(dataset) = guard.as_ref() {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(self.produce(run_id)?);
        *guard = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    fn produce(&self, run_id: &str) -> ResultsResult<RunDataset> {
        match &self.source {
            RunSource::Inputs {
                fields,
                deltas,
                artifacts,
            } => {
                if let Some(artifacts) = artifacts
                    && artifacts.has_run(run_id)
                {
                    tracing::debug!(run_id, "loading run artifact");
                    return artifacts.load_run(run_id);
                }
                tracing::debug!(run_id, "materializing run");
                Ok(materialize_run(&self.catalog, fields, deltas, run_id))
            }
            RunSource::ArtifactsOnly(artifacts) => {
                tracing::debug!(run_id, "loading run artifact");
                artifacts.load_run(run_id)
            }
        }
    }

    /// Number of memoized datasets, for diagnostics.
    pub fn cached_len(&self) -> usize {
        lock_unpoisoned(&self.memo)
            .values()
            .filter(|slot| lock_unpoisoned(slot).is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResultsError;
    use oci_data::DeltaTable;

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_json_str(
                r#"{
                    "flaring": { "type": "slider", "values": "0,1" },
                    "gwp": { "type": "toggle", "values": "20,100" }
                }"#,
            )
            .unwrap(),
        )
    }

    fn fields() -> Arc<FieldTable> {
        Arc::new(
            FieldTable::from_json_str(
                r#"{
                    "F": {
                        "Field Name": "F",
                        "gwp20": {
                            "Upstream Emissions": 150,
                            "Midstream Emissions": 60,
                            "Downstream Emissions": 410
                        },
                        "gwp100": {
                            "Upstream Emissions": 100,
                            "Midstream Emissions": 50,
                            "Downstream Emissions": 400
                        }
                    }
                }"#,
            )
            .unwrap(),
        )
    }

    fn deltas() -> Arc<DeltaTables> {
        let csv = "slider,value,stage,F\nflaring,1,upstream,5\n";
        Arc::new(DeltaTables {
            gwp20: DeltaTable::from_csv_str(csv).unwrap(),
            gwp100: DeltaTable::from_csv_str(csv).unwrap(),
        })
    }

    fn store() -> RunStore {
        RunStore::with_inputs(catalog(), fields(), deltas(), None)
    }

    #[test]
    fn memoizes_and_shares_datasets() {
        let store = store();
        let first = store.get("11").unwrap();
        let second = store.get("11").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.cached_len(), 1);
        assert_eq!(first["F"].upstream, 105.0);
    }

    #[test]
    fn rejects_malformed_ids() {
        let store = store();
        assert!(matches!(
            store.get("9"),
            Err(ResultsError::MalformedRunId(_))
        ));
        assert!(matches!(
            store.get("abc"),
            Err(ResultsError::MalformedRunId(_))
        ));
    }

    #[test]
    fn concurrent_misses_coalesce() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.get("01").unwrap())
            })
            .collect();
        let datasets: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        // one insertion; every caller sees the same allocation
        for dataset in &datasets[1..] {
            assert!(Arc::ptr_eq(&datasets[0], dataset));
        }
        assert_eq!(store.cached_len(), 1);
    }

    #[test]
    fn artifacts_only_store_misses_are_run_not_found() {
        let dir = std::env::temp_dir().join(format!(
            "oci_store_missing_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        let store = RunStore::artifacts_only(catalog(), ArtifactStore::open(dir));
        assert!(matches!(
            store.get("00"),
            Err(ResultsError::RunNotFound { .. })
        ));
    }

    #[test]
    fn prefers_prebaked_artifact_over_materialization() {
        let dir = std::env::temp_dir().join(format!(
            "oci_store_prebaked_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        let artifacts = ArtifactStore::new(dir).unwrap();
        let mut baked = RunDataset::new();
        baked.insert(
            "F".to_string(),
            oci_core::StageTriple {
                upstream: 999.0,
                midstream: 0.0,
                downstream: 0.0,
            },
        );
        artifacts.save_run("11", &baked).unwrap();

        let store = RunStore::with_inputs(catalog(), fields(), deltas(), Some(artifacts));
        assert_eq!(store.get("11").unwrap()["F"].upstream, 999.0);
        // other runs still materialize
        assert_eq!(store.get("00").unwrap()["F"].upstream, 150.0);
    }
}
