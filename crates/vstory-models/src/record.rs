//! Persisted record of one storyboard run.
//!
//! Session storage receives this alongside the rendered storyboard image;
//! the core knows nothing about where either ends up on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::caption::SceneCaption;
use crate::scene::SceneInterval;
use crate::transcript::SceneTranscript;

/// Unique identifier for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything decided about one scene, flattened for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub interval: SceneInterval,
    pub transcript: SceneTranscript,
    pub caption: SceneCaption,
}

/// The structured output of one run: every interval and caption decision,
/// in scene order, plus run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryboardRecord {
    pub run_id: RunId,
    /// Source video path as supplied by session storage
    pub video_path: String,
    /// Video duration in seconds
    pub duration: f64,
    pub total_scenes: u32,
    pub scenes: Vec<SceneRecord>,
    pub created_at: DateTime<Utc>,
}

impl StoryboardRecord {
    /// Assemble a record from the per-stage outputs.
    ///
    /// The three lists are 1:1 and in scene order by construction; this is
    /// asserted rather than silently zipped short.
    pub fn assemble(
        run_id: RunId,
        video_path: impl Into<String>,
        duration: f64,
        intervals: Vec<SceneInterval>,
        transcripts: Vec<SceneTranscript>,
        captions: Vec<SceneCaption>,
    ) -> Self {
        assert_eq!(intervals.len(), transcripts.len());
        assert_eq!(intervals.len(), captions.len());

        let scenes: Vec<SceneRecord> = intervals
            .into_iter()
            .zip(transcripts)
            .zip(captions)
            .map(|((interval, transcript), caption)| SceneRecord {
                interval,
                transcript,
                caption,
            })
            .collect();

        Self {
            run_id,
            video_path: video_path.into(),
            duration,
            total_scenes: scenes.len() as u32,
            scenes,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::CaptionSource;
    use crate::scene::FrameInfo;
    use crate::transcript::SceneTranscript;

    fn sample_scene(ordinal: u32, start: f64, end: f64) -> (SceneInterval, SceneTranscript, SceneCaption) {
        (
            SceneInterval {
                ordinal,
                start_time: start,
                end_time: end,
                representative_frame: FrameInfo {
                    index: ordinal,
                    timestamp: start,
                },
            },
            SceneTranscript::new(ordinal, String::new()),
            SceneCaption {
                scene_ordinal: ordinal,
                visual_caption: "a room".to_string(),
                fused_text: "A room".to_string(),
                source: CaptionSource::Visual,
            },
        )
    }

    #[test]
    fn test_assemble_preserves_order() {
        let (i0, t0, c0) = sample_scene(0, 0.0, 2.0);
        let (i1, t1, c1) = sample_scene(1, 2.0, 5.0);

        let record = StoryboardRecord::assemble(
            RunId::new(),
            "/tmp/video.mp4",
            5.0,
            vec![i0, i1],
            vec![t0, t1],
            vec![c0, c1],
        );

        assert_eq!(record.total_scenes, 2);
        assert_eq!(record.scenes[0].interval.ordinal, 0);
        assert_eq!(record.scenes[1].caption.scene_ordinal, 1);
    }

    #[test]
    fn test_record_serializes() {
        let (i0, t0, c0) = sample_scene(0, 0.0, 2.0);
        let record = StoryboardRecord::assemble(
            RunId::new(),
            "/tmp/video.mp4",
            2.0,
            vec![i0],
            vec![t0],
            vec![c0],
        );
        let json = serde_json::to_string_pretty(&record).unwrap();
        assert!(json.contains("\"total_scenes\": 1"));
    }
}
