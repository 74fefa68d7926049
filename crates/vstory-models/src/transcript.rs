//! Transcript fragments from ASR and their per-scene aggregation.

use serde::{Deserialize, Serialize};

/// One contiguous span of recognized speech with timing.
///
/// Fragments are ordered by `start_time` and do not overlap each other,
/// though a fragment may span a scene boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    /// Recognized text
    pub text: String,
}

impl TranscriptFragment {
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            text: text.into(),
        }
    }
}

/// Aggregated speech for one scene, derived by the aligner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTranscript {
    /// Ordinal of the scene this transcript belongs to
    pub scene_ordinal: u32,
    /// Concatenated fragment text, single-space separated
    pub text: String,
    /// True for silent scenes (no overlapping fragment); a normal outcome
    pub is_empty: bool,
}

impl SceneTranscript {
    /// Build a scene transcript; `is_empty` is derived from the text.
    pub fn new(scene_ordinal: u32, text: String) -> Self {
        let is_empty = text.trim().is_empty();
        Self {
            scene_ordinal,
            text,
            is_empty,
        }
    }

    /// Number of whitespace-separated words after trimming.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_derived() {
        assert!(SceneTranscript::new(0, "   ".to_string()).is_empty);
        assert!(!SceneTranscript::new(0, "hello".to_string()).is_empty);
    }

    #[test]
    fn test_word_count() {
        let t = SceneTranscript::new(1, "  hello   there friend ".to_string());
        assert_eq!(t.word_count(), 3);
    }
}
