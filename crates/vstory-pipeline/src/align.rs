//! Transcript-to-scene alignment.
//!
//! Two-pointer sweep over the time-ordered scene intervals and transcript
//! fragments, linear in both lists. A fragment overlapping a scene by any
//! non-zero duration contributes its text; a fragment spanning a boundary
//! contributes to both adjacent scenes, deliberately favoring dialogue
//! recall over strict partition.

use vstory_models::{SceneInterval, SceneTranscript, TranscriptFragment};

/// Produce one `SceneTranscript` per interval, in interval order.
///
/// A scene with no overlapping fragment yields an empty transcript, which is
/// a normal outcome (silent scene), not an error.
pub fn align_transcripts(
    intervals: &[SceneInterval],
    fragments: &[TranscriptFragment],
) -> Vec<SceneTranscript> {
    let mut transcripts = Vec::with_capacity(intervals.len());
    let mut cursor = 0usize;

    for interval in intervals {
        // Skip fragments that ended before this scene; fragments spanning
        // the previous boundary stay visible to this scene
        while cursor < fragments.len() && fragments[cursor].end_time <= interval.start_time {
            cursor += 1;
        }

        let mut text = String::new();
        let mut i = cursor;
        while i < fragments.len() && fragments[i].start_time < interval.end_time {
            if fragments[i].end_time > interval.start_time {
                let fragment_text = fragments[i].text.trim();
                if !fragment_text.is_empty() {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(fragment_text);
                }
            }
            i += 1;
        }

        transcripts.push(SceneTranscript::new(interval.ordinal, text));
    }

    transcripts
}
