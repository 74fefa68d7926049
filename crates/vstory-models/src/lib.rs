//! Shared data models for the storyboard pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Sampled frames and scene intervals
//! - Transcript fragments and per-scene transcripts
//! - Caption fusion decisions
//! - The persisted storyboard run record

pub mod caption;
pub mod record;
pub mod scene;
pub mod timestamp;
pub mod transcript;

// Re-export common types
pub use caption::{CaptionSource, SceneCaption};
pub use record::{RunId, SceneRecord, StoryboardRecord};
pub use scene::{FrameInfo, SceneInterval};
pub use timestamp::format_seconds;
pub use transcript::{SceneTranscript, TranscriptFragment};
