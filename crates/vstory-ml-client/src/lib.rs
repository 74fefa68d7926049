//! Client for the Python ML sidecar.
//!
//! The core treats every model call as an external collaborator behind a
//! narrow HTTP contract: `/transcribe` (Whisper), `/caption` (BLIP),
//! `/rewrite` (caption rewriting) and `/health`. Failures map to per-scene
//! fallbacks upstream; nothing here is fatal to a run.

pub mod client;
pub mod error;
pub mod types;

pub use client::{MlClient, MlClientConfig};
pub use error::{MlError, MlResult};
pub use types::{
    CaptionRequest, CaptionResponse, HealthResponse, RewriteRequest, RewriteResponse,
    TranscribeRequest, TranscribeResponse, TranscriptSegment,
};
