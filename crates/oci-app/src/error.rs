//! Error types for the oci-app service layer.

/// Application error that wraps errors from the backend crates and provides
/// a unified interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Input data error: {0}")]
    Data(String),

    #[error("Malformed run ID: {0}")]
    MalformedRunId(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for oci-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<oci_data::DataError> for AppError {
    fn from(err: oci_data::DataError) -> Self {
        AppError::Data(err.to_string())
    }
}

impl From<oci_model::ModelError> for AppError {
    fn from(err: oci_model::ModelError) -> Self {
        AppError::MalformedRunId(err.to_string())
    }
}

impl From<oci_results::ResultsError> for AppError {
    fn from(err: oci_results::ResultsError) -> Self {
        match err {
            oci_results::ResultsError::MalformedRunId(e) => {
                AppError::MalformedRunId(e.to_string())
            }
            oci_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
