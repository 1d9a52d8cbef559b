//! oci-results: run artifact persistence, the memoizing run store, and the
//! global extent cache.

pub mod artifacts;
pub mod extents;
pub mod store;
pub mod types;

pub use artifacts::ArtifactStore;
pub use extents::ExtentCache;
pub use store::RunStore;
pub use types::{ExtentQuery, GlobalExtents};

pub use oci_model::{RunDataset, RunId};

pub type ResultsResult<T> = Result<T, ResultsError>;

pub(crate) fn lock_unpoisoned<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    MalformedRunId(#[from] oci_model::ModelError),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Field not found: {field}")]
    FieldNotFound { field: String },

    #[error("No finite {ratio} extent for {field}: conversion constants unavailable")]
    NonFiniteExtent { ratio: &'static str, field: String },

    #[error("Extent scan over an empty field set")]
    EmptyExtentScan,
}
