//! oci-core: stable vocabulary for the OCI engine.
//!
//! Contains:
//! - stage (emissions stages, stage triples, extent components/directions)
//! - ratio (display-unit ratios + pure conversion)
//! - metrics (chart metric catalog: dataset keys, names, units)

pub mod metrics;
pub mod ratio;
pub mod stage;

// Re-exports: nice ergonomics for downstream crates
pub use metrics::MetricKey;
pub use ratio::{FieldConstants, Ratio, convert};
pub use stage::{Component, Direction, Stage, StageTriple};
