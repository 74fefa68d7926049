//! ML client error types.

use thiserror::Error;

/// Result type for ML service operations.
pub type MlResult<T> = Result<T, MlError>;

/// Errors from the ML sidecar.
#[derive(Debug, Error)]
pub enum MlError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("ML service request failed: {0}")]
    RequestFailed(String),

    #[error("ML service returned an unusable response: {0}")]
    InvalidResponse(String),
}

impl MlError {
    /// Whether the failure was a timeout; timeouts get at most one retry
    /// before the caller falls back.
    pub fn is_timeout(&self) -> bool {
        matches!(self, MlError::Network(e) if e.is_timeout())
    }
}
