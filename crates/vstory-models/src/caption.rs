//! Caption fusion decision records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which cue won the fusion decision for a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionSource {
    /// Visual caption only (silent scene or trivial speech)
    Visual,
    /// Spoken transcript was informative enough to lead
    Speech,
    /// Both cues present and roughly comparable, concatenated
    Merged,
}

impl fmt::Display for CaptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaptionSource::Visual => "visual",
            CaptionSource::Speech => "speech",
            CaptionSource::Merged => "merged",
        };
        write!(f, "{}", s)
    }
}

/// The final caption decision for one scene.
///
/// Immutable once emitted by the fusion policy; consumed only by the
/// compositor and the run record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneCaption {
    /// Ordinal of the scene this caption belongs to
    pub scene_ordinal: u32,
    /// Raw description from the visual captioning collaborator
    pub visual_caption: String,
    /// The caption that ends up on the panel
    pub fused_text: String,
    /// Which cue the fused text came from
    pub source: CaptionSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serde_snake_case() {
        let json = serde_json::to_string(&CaptionSource::Merged).unwrap();
        assert_eq!(json, "\"merged\"");
        let back: CaptionSource = serde_json::from_str("\"speech\"").unwrap();
        assert_eq!(back, CaptionSource::Speech);
    }

    #[test]
    fn test_caption_round_trip() {
        let caption = SceneCaption {
            scene_ordinal: 2,
            visual_caption: "a dog in a park".to_string(),
            fused_text: "A dog in a park".to_string(),
            source: CaptionSource::Visual,
        };
        let json = serde_json::to_string(&caption).unwrap();
        let back: SceneCaption = serde_json::from_str(&json).unwrap();
        assert_eq!(back, caption);
    }
}
