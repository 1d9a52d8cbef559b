//! Interactive session state.
//!
//! A `Session` owns every collaborator the live lookup path needs — catalog,
//! baseline fields, delta tables, price book, run store, extent cache — as
//! explicit injected state created at startup. There are no ambient globals;
//! frontends hold the session and pass queries through it.

use crate::error::{AppError, AppResult};
use oci_data::{Catalog, DeltaTables, FieldTable, PriceBook};
use oci_model::{ParamValues, RunDataset, RunId, decode_run, encode_run, enumerate_runs};
use oci_results::{ArtifactStore, ExtentCache, ExtentQuery, GlobalExtents, RunStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Locations of the external input artifacts.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub metadata: PathBuf,
    pub info: PathBuf,
    pub deltas20: PathBuf,
    pub deltas100: PathBuf,
    /// Optional; without one, per-dollar extents cannot be computed and are
    /// omitted from batch artifacts.
    pub prices: Option<PathBuf>,
    /// Optional directory of prebaked run artifacts to prefer over
    /// materialization.
    pub runs_dir: Option<PathBuf>,
}

pub struct Session {
    catalog: Arc<Catalog>,
    fields: Arc<FieldTable>,
    deltas: Arc<DeltaTables>,
    prices: PriceBook,
    store: RunStore,
    extents: ExtentCache,
}

impl Session {
    pub fn new(
        catalog: Arc<Catalog>,
        fields: Arc<FieldTable>,
        deltas: Arc<DeltaTables>,
        prices: PriceBook,
        runs_dir: Option<&Path>,
    ) -> Session {
        let artifacts = runs_dir.map(ArtifactStore::open);
        let store = RunStore::with_inputs(
            Arc::clone(&catalog),
            Arc::clone(&fields),
            Arc::clone(&deltas),
            artifacts,
        );
        Session {
            catalog,
            fields,
            deltas,
            prices,
            store,
            extents: ExtentCache::new(),
        }
    }

    /// Load every input artifact and assemble a session. Parse failures are
    /// fatal here — the engine cannot operate without valid inputs.
    pub fn load(paths: &InputPaths) -> AppResult<Session> {
        let catalog = Arc::new(Catalog::load(&paths.metadata)?);
        let fields = Arc::new(FieldTable::load(&paths.info)?);
        let deltas = Arc::new(DeltaTables::load(&paths.deltas20, &paths.deltas100)?);
        let prices = match &paths.prices {
            Some(path) => PriceBook::load(path)?,
            None => PriceBook::default(),
        };
        Ok(Session::new(
            catalog,
            fields,
            deltas,
            prices,
            paths.runs_dir.as_deref(),
        ))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Shared handles to the loaded inputs, for callers that hand them to
    /// [`crate::precalc::precalc`].
    pub fn catalog_arc(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn fields_arc(&self) -> &Arc<FieldTable> {
        &self.fields
    }

    pub fn deltas_arc(&self) -> &Arc<DeltaTables> {
        &self.deltas
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    pub fn deltas(&self) -> &DeltaTables {
        &self.deltas
    }

    pub fn prices(&self) -> &PriceBook {
        &self.prices
    }

    pub fn default_run_id(&self) -> RunId {
        self.catalog.default_run_id()
    }

    /// The full run-ID space under the current catalog.
    pub fn run_ids(&self) -> Vec<RunId> {
        enumerate_runs(&self.catalog)
    }

    /// Fetch one run's dataset. Malformed or missing runs surface as typed
    /// errors; see [`Session::dataset_or_default`] for the fallback policy.
    pub fn dataset(&self, run_id: &str) -> AppResult<Arc<RunDataset>> {
        Ok(self.store.get(run_id)?)
    }

    /// Fetch a run's dataset, falling back to the all-default run when the
    /// requested ID is malformed or has no data. Returns the ID actually
    /// served. This is the caller-side recovery policy for user-supplied IDs
    /// (e.g. from shared URLs).
    pub fn dataset_or_default(&self, run_id: &str) -> AppResult<(RunId, Arc<RunDataset>)> {
        match self.dataset(run_id) {
            Ok(dataset) => Ok((run_id.to_string(), dataset)),
            Err(AppError::MalformedRunId(reason)) => {
                tracing::warn!(run_id, reason = %reason, "falling back to default run");
                let default = self.default_run_id();
                let dataset = self.dataset(&default)?;
                Ok((default, dataset))
            }
            Err(AppError::RunNotFound(missing)) => {
                tracing::warn!(run_id = %missing, "run missing, falling back to default run");
                let default = self.default_run_id();
                let dataset = self.dataset(&default)?;
                Ok((default, dataset))
            }
            Err(other) => Err(other),
        }
    }

    /// Fetch the dataset for raw parameter values.
    pub fn dataset_for_params(&self, params: &ParamValues) -> AppResult<(RunId, Arc<RunDataset>)> {
        let run_id = encode_run(&self.catalog, params);
        let dataset = self.dataset(&run_id)?;
        Ok((run_id, dataset))
    }

    /// Decode a run ID into parameter values (lenient, never fails).
    pub fn params_for_run(&self, run_id: &str) -> ParamValues {
        decode_run(&self.catalog, run_id)
    }

    /// Cached-or-computed global extent.
    pub fn extent(&self, query: &ExtentQuery) -> AppResult<f64> {
        Ok(self
            .extents
            .extent(&self.store, &self.fields, &self.prices, query)?)
    }

    /// Every extent combination (the batch artifact, computed in-session).
    pub fn all_extents(&self) -> AppResult<GlobalExtents> {
        Ok(self
            .extents
            .all_extents(&self.store, &self.fields, &self.prices)?)
    }

    /// Update one product price. Bumps the price epoch, invalidating cached
    /// per-dollar extents.
    pub fn set_price(&mut self, product: &str, price: f64) {
        self.prices.set(product, price);
    }

    /// Replace the whole price book as a single epoch step.
    pub fn replace_prices(&mut self, prices: BTreeMap<String, f64>) {
        self.prices.replace_all(prices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oci_data::DeltaTable;

    fn session() -> Session {
        let catalog = Arc::new(
            Catalog::from_json_str(
                r#"{
                    "flaring": { "type": "slider", "values": "0,1" },
                    "gwp": { "type": "toggle", "values": "20,100" }
                }"#,
            )
            .unwrap(),
        );
        let fields = Arc::new(
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
        );
        let deltas = Arc::new(DeltaTables {
            gwp20: DeltaTable::from_csv_str("slider,value,stage,F\nflaring,1,upstream,5\n")
                .unwrap(),
            gwp100: DeltaTable::from_csv_str("slider,value,stage,F\nflaring,1,upstream,5\n")
                .unwrap(),
        });
        Session::new(catalog, fields, deltas, PriceBook::default(), None)
    }

    #[test]
    fn dataset_by_id_and_by_params() {
        let session = session();
        let dataset = session.dataset("11").unwrap();
        assert_eq!(dataset["F"].upstream, 105.0);

        let mut params = ParamValues::new();
        params.insert("flaring".to_string(), 1.0);
        params.insert("gwp".to_string(), 100.0);
        let (run_id, dataset) = session.dataset_for_params(&params).unwrap();
        assert_eq!(run_id, "11");
        assert_eq!(dataset["F"].upstream, 105.0);
    }

    #[test]
    fn malformed_id_falls_back_to_default_run() {
        let session = session();
        let (run_id, dataset) = session.dataset_or_default("zz9").unwrap();
        assert_eq!(run_id, "00");
        assert_eq!(dataset["F"].upstream, 150.0);
    }

    #[test]
    fn run_ids_match_catalog_product() {
        let session = session();
        assert_eq!(session.run_ids().len(), 4);
        assert_eq!(session.default_run_id(), "00");
    }
}
