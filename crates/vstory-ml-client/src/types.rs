//! ML service request/response types.

use serde::{Deserialize, Serialize};
use vstory_models::TranscriptFragment;

/// Request for speech recognition over an extracted audio track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeRequest {
    /// Path to the 16 kHz mono WAV file
    pub audio_path: String,
}

/// One recognized speech span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl From<TranscriptSegment> for TranscriptFragment {
    fn from(segment: TranscriptSegment) -> Self {
        TranscriptFragment::new(segment.start, segment.end, segment.text)
    }
}

/// Response from `/transcribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub segments: Vec<TranscriptSegment>,
}

/// Request for a visual caption of one representative frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionRequest {
    /// Path to the frame image
    pub image_path: String,
}

/// Response from `/caption`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionResponse {
    pub caption: String,
}

/// Request to rewrite a fused caption context into one short narrative line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRequest {
    /// Fusion context (transcript and/or visual caption plus instruction)
    pub context: String,
    /// Upper bound the rewriter should aim for
    pub max_chars: usize,
}

/// Response from `/rewrite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteResponse {
    pub text: String,
}

/// Response from `/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
