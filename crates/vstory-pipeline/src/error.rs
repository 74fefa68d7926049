//! Pipeline error types.
//!
//! Failures are isolated to the smallest unit possible: collaborator
//! timeouts and failures degrade one scene via the fusion fallback and never
//! reach this type. Only undecodable video, broken configuration or an
//! unusable rendering environment abort a run.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Media error: {0}")]
    Media(#[from] vstory_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// True when the underlying cause is an undecodable video; no frames
    /// means no pipeline.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::Media(vstory_media::MediaError::DecodeFailed(_))
        )
    }
}
