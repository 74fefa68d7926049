//! Caption fusion policy.
//!
//! Deterministic decision combining the visual caption and the aligned
//! transcript into one rewriting context, with a fallback caption used
//! verbatim whenever the rewriting collaborator is unavailable or returns
//! degenerate text. A panel never lacks a caption.

use vstory_models::{CaptionSource, SceneCaption, SceneTranscript};

/// The fusion decision for one scene, made before any rewriter call.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionDecision {
    pub source: CaptionSource,
    /// Context handed to the rewriting collaborator
    pub rewrite_context: String,
    /// Caption used verbatim when rewriting fails
    pub fallback: String,
}

/// Caption fusion policy parameters.
#[derive(Debug, Clone)]
pub struct FusionPolicy {
    /// Minimum trimmed word count for speech to lead
    pub min_speech_words: usize,
    /// Final caption length cap in characters
    pub max_caption_chars: usize,
}

impl Default for FusionPolicy {
    fn default() -> Self {
        Self {
            min_speech_words: 3,
            max_caption_chars: 120,
        }
    }
}

impl FusionPolicy {
    /// Decide the caption source and build the rewrite context, in a total
    /// order of preference:
    /// 1. informative speech leads, visual caption supports;
    /// 2. thin speech next to a non-trivial visual caption merges both;
    /// 3. otherwise the visual caption stands alone.
    pub fn decide(&self, visual_caption: &str, transcript: &SceneTranscript) -> FusionDecision {
        let speech = clean_text(&transcript.text);
        let visual = clean_text(visual_caption);
        let speech_words = speech.split_whitespace().count();

        if !speech.is_empty() && speech_words >= self.min_speech_words {
            return FusionDecision {
                source: CaptionSource::Speech,
                rewrite_context: format!(
                    "Rewrite the spoken line below as one short narrative storyboard caption. \
                     Keep it brief.\nSpoken: {}\nOn screen: {}",
                    speech, visual
                ),
                fallback: speech,
            };
        }

        if !speech.is_empty() && !visual.is_empty() {
            let merged = format!("{}. {}", visual.trim_end_matches('.'), speech);
            return FusionDecision {
                source: CaptionSource::Merged,
                rewrite_context: format!(
                    "Combine the visual description and the spoken words below into one short \
                     narrative storyboard caption.\nOn screen: {}\nSpoken: {}",
                    visual, speech
                ),
                fallback: merged,
            };
        }

        let fallback = if visual.is_empty() {
            // Even a scene with no cues gets a caption
            format!("Scene {}", transcript.scene_ordinal + 1)
        } else {
            visual.clone()
        };
        FusionDecision {
            source: CaptionSource::Visual,
            rewrite_context: format!(
                "Rewrite this visual description as one short narrative storyboard caption: {}",
                fallback
            ),
            fallback,
        }
    }

    /// Apply the rewriter's output (if usable) or the fallback, then cap the
    /// length at a word boundary.
    pub fn finalize(
        &self,
        decision: FusionDecision,
        rewritten: Option<String>,
        visual_caption: &str,
        scene_ordinal: u32,
    ) -> SceneCaption {
        let chosen = match rewritten {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => decision.fallback,
        };

        SceneCaption {
            scene_ordinal,
            visual_caption: visual_caption.to_string(),
            fused_text: cap_caption(&chosen, self.max_caption_chars),
            source: decision.source,
        }
    }
}

/// Collapse whitespace and capitalize the first letter.
pub fn clean_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => collapsed,
    }
}

/// Truncate to at most `max_chars` characters at a word boundary, never
/// mid-word, appending an ellipsis when anything was dropped. A first word
/// that alone exceeds the cap is the one degenerate case where a character
/// cut is unavoidable.
pub fn cap_caption(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut kept = String::new();
    for word in text.split_whitespace() {
        let candidate_len = if kept.is_empty() {
            word.chars().count()
        } else {
            kept.chars().count() + 1 + word.chars().count()
        };
        // Reserve one character for the ellipsis
        if candidate_len + 1 > max_chars {
            break;
        }
        if !kept.is_empty() {
            kept.push(' ');
        }
        kept.push_str(word);
    }

    if kept.is_empty() {
        kept = text.chars().take(max_chars.saturating_sub(1)).collect();
    }
    kept.push('…');
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use vstory_models::SceneTranscript;

    fn transcript(ordinal: u32, text: &str) -> SceneTranscript {
        SceneTranscript::new(ordinal, text.to_string())
    }

    #[test]
    fn test_informative_speech_leads() {
        let policy = FusionPolicy::default();
        let decision = policy.decide("a man at a desk", &transcript(0, "we need to talk about this"));

        assert_eq!(decision.source, CaptionSource::Speech);
        assert_eq!(decision.fallback, "We need to talk about this");
        assert!(decision.rewrite_context.contains("a man at a desk"));
    }

    #[test]
    fn test_silent_scene_uses_visual() {
        let policy = FusionPolicy::default();
        let decision = policy.decide("a dog in a park", &transcript(0, ""));

        assert_eq!(decision.source, CaptionSource::Visual);
        assert_eq!(decision.fallback, "A dog in a park");
    }

    #[test]
    fn test_thin_speech_merges_with_visual() {
        let policy = FusionPolicy::default();
        let decision = policy.decide("a crowded street", &transcript(0, "watch out"));

        assert_eq!(decision.source, CaptionSource::Merged);
        assert!(decision.fallback.contains("A crowded street"));
        assert!(decision.fallback.contains("Watch out"));
    }

    #[test]
    fn test_no_cues_falls_back_to_scene_number() {
        let policy = FusionPolicy::default();
        let decision = policy.decide("  ", &transcript(2, ""));

        assert_eq!(decision.source, CaptionSource::Visual);
        assert_eq!(decision.fallback, "Scene 3");
    }

    #[test]
    fn test_decision_is_deterministic() {
        let policy = FusionPolicy::default();
        let t = transcript(1, "hello there my friend");
        let a = policy.decide("a park bench", &t);
        let b = policy.decide("a park bench", &t);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rewriter_failure_uses_fallback_verbatim() {
        let policy = FusionPolicy::default();
        let decision = policy.decide("a dog in a park", &transcript(0, ""));
        let caption = policy.finalize(decision, None, "a dog in a park", 0);

        assert_eq!(caption.fused_text, "A dog in a park");
        assert_eq!(caption.source, CaptionSource::Visual);
        assert_eq!(caption.visual_caption, "a dog in a park");
    }

    #[test]
    fn test_empty_rewrite_counts_as_failure() {
        let policy = FusionPolicy::default();
        let decision = policy.decide("a dog in a park", &transcript(0, ""));
        let caption = policy.finalize(decision, Some("   ".to_string()), "a dog in a park", 0);
        assert_eq!(caption.fused_text, "A dog in a park");
    }

    #[test]
    fn test_successful_rewrite_is_used() {
        let policy = FusionPolicy::default();
        let decision = policy.decide("a dog in a park", &transcript(0, ""));
        let caption = policy.finalize(
            decision,
            Some("A dog bounds across the sunny park.".to_string()),
            "a dog in a park",
            0,
        );
        assert_eq!(caption.fused_text, "A dog bounds across the sunny park.");
    }

    #[test]
    fn test_cap_truncates_at_word_boundary() {
        let capped = cap_caption("the quick brown fox jumps over the lazy dog", 20);
        assert!(capped.chars().count() <= 20);
        assert!(capped.ends_with('…'));
        // Never a partial word before the ellipsis
        assert_eq!(capped, "the quick brown fox…");
    }

    #[test]
    fn test_cap_leaves_short_text_alone() {
        assert_eq!(cap_caption("short", 120), "short");
    }

    #[test]
    fn test_cap_handles_single_giant_word() {
        let capped = cap_caption(&"x".repeat(300), 10);
        assert_eq!(capped.chars().count(), 10);
        assert!(capped.ends_with('…'));
    }

    #[test]
    fn test_clean_text_collapses_and_capitalizes() {
        assert_eq!(clean_text("  hello   there  "), "Hello there");
        assert_eq!(clean_text(""), "");
    }
}
