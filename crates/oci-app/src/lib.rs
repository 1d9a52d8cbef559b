//! Shared application service layer for the OCI engine.
//!
//! This crate provides a unified interface for frontends, centralizing input
//! loading, the interactive lookup session, and the batch precalc pipeline.

pub mod error;
pub mod precalc;
pub mod progress;
pub mod session;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use precalc::{PrecalcOptions, PrecalcSummary, precalc};
pub use progress::{PrecalcProgressEvent, PrecalcStage};
pub use session::{InputPaths, Session};
