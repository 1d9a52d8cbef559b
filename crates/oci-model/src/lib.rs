//! oci-model: run-space enumeration, run-ID codec, run materialization.
//!
//! A run is one combination of parameter values, identified by a fixed-width
//! digit string: one decimal digit per catalog parameter, parameters in
//! lexicographic name order, each digit indexing into that parameter's value
//! domain.

pub mod codec;
pub mod enumerate;
pub mod materialize;

pub use codec::{ParamValues, decode_run, encode_run, validate_run_id};
pub use enumerate::enumerate_runs;
pub use materialize::{RunDataset, materialize_run};

/// Fixed-width digit-string run identifier.
pub type RunId = String;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Malformed run ID `{run_id}`: {reason}")]
    MalformedRunId { run_id: String, reason: String },
}
