//! Pipeline configuration.

use std::path::PathBuf;

use crate::error::{PipelineError, PipelineResult};

/// Tunables for one storyboard run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Seconds between sampled frames
    pub sample_interval: f64,
    /// Scene boundary sensitivity threshold in (0,1)
    pub scene_threshold: f64,
    /// Ceiling on the scene count (bounds downstream collaborator cost)
    pub max_scenes: Option<usize>,
    /// Storyboard column count; computed from the scene count when unset
    pub columns: Option<u32>,
    /// Scenes processed in parallel against the ML sidecar
    pub max_scene_parallel: usize,
    /// Minimum trimmed word count for speech to lead a caption
    pub min_speech_words: usize,
    /// Final caption length cap
    pub max_caption_chars: usize,
    /// Caption font; system locations are searched when unset
    pub font_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_interval: 1.0,
            scene_threshold: 0.5,
            max_scenes: Some(24),
            columns: None,
            max_scene_parallel: 4,
            min_speech_words: 3,
            max_caption_chars: 120,
            font_path: None,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sample_interval: env_parse("STORYBOARD_SAMPLE_INTERVAL", defaults.sample_interval),
            scene_threshold: env_parse("STORYBOARD_SCENE_THRESHOLD", defaults.scene_threshold),
            max_scenes: std::env::var("STORYBOARD_MAX_SCENES")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(defaults.max_scenes),
            columns: std::env::var("STORYBOARD_COLUMNS")
                .ok()
                .and_then(|s| s.parse().ok()),
            max_scene_parallel: env_parse("STORYBOARD_SCENE_PARALLEL", defaults.max_scene_parallel),
            min_speech_words: env_parse("STORYBOARD_MIN_SPEECH_WORDS", defaults.min_speech_words),
            max_caption_chars: env_parse("STORYBOARD_MAX_CAPTION_CHARS", defaults.max_caption_chars),
            font_path: std::env::var("STORYBOARD_FONT_PATH").ok().map(PathBuf::from),
        }
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> PipelineResult<()> {
        if !(self.scene_threshold > 0.0 && self.scene_threshold < 1.0) {
            return Err(PipelineError::config_error(format!(
                "scene_threshold must be in (0,1), got {}",
                self.scene_threshold
            )));
        }
        if self.sample_interval <= 0.0 {
            return Err(PipelineError::config_error("sample_interval must be positive"));
        }
        if self.max_scene_parallel == 0 {
            return Err(PipelineError::config_error("max_scene_parallel must be at least 1"));
        }
        if self.columns == Some(0) {
            return Err(PipelineError::config_error("columns must be at least 1"));
        }
        if self.max_scenes == Some(0) {
            return Err(PipelineError::config_error("max_scenes must be at least 1"));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
