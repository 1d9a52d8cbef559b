//! oci-data: input artifact formats and loading.
//!
//! The engine consumes four external artifacts: the parameter catalog
//! (metadata.json), the baseline field table (info.json), two slider delta
//! tables (CSV, one per GWP horizon), and the product price book
//! (prices.json). Parse or validation failures here are fatal — the engine
//! cannot operate without valid inputs.

pub mod catalog;
pub mod deltas;
pub mod fields;
pub mod prices;

pub use catalog::{Catalog, ParameterDef, ParameterKind};
pub use deltas::{DeltaTable, DeltaTables};
pub use fields::{BaselineTriple, FieldRecord, FieldTable, GwpHorizon};
pub use prices::PriceBook;

pub type DataResult<T> = Result<T, DataError>;

#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid {artifact}: {what}")]
    Invalid {
        artifact: &'static str,
        what: String,
    },
}

pub(crate) fn read_file(path: &std::path::Path) -> DataResult<String> {
    std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}
