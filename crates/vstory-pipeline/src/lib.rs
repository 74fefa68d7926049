//! Storyboard pipeline orchestrator.
//!
//! Strictly sequential, single-pass batch over one video:
//! frame source -> scene segmenter -> {transcript aligner, visual
//! captioning} -> caption fusion -> storyboard compositor. Per-scene
//! collaborator calls fan out over a bounded pool and reassemble in scene
//! order; everything else is a forward chain of owned values.

pub mod align;
pub mod config;
pub mod error;
pub mod fanout;
pub mod fusion;
pub mod logging;
pub mod run;

pub use align::align_transcripts;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use fusion::{FusionDecision, FusionPolicy};
pub use run::{run_pipeline, RunOutput};
