//! Scene intervals produced by the segmenter.

use serde::{Deserialize, Serialize};

/// Metadata for one sampled frame (the raster itself lives in the media layer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    /// Index in the sampled frame sequence
    pub index: u32,
    /// Timestamp in seconds from the start of the video
    pub timestamp: f64,
}

/// One visually coherent time interval of the video.
///
/// Intervals are produced in strictly increasing, non-overlapping, contiguous
/// order covering `[0, duration)`; the last interval ends at the video's true
/// duration. They are read-only once emitted by the segmenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneInterval {
    /// Zero-based scene ordinal
    pub ordinal: u32,
    /// Start time in seconds (inclusive)
    pub start_time: f64,
    /// End time in seconds (exclusive)
    pub end_time: f64,
    /// The first sampled frame of the interval
    pub representative_frame: FrameInfo,
}

impl SceneInterval {
    /// Interval duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Whether `[start_time, end_time)` overlaps another half-open span by
    /// any non-zero duration.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        start < self.end_time && end > self.start_time
    }
}

/// Check the segmenter output invariant: ordered, non-overlapping,
/// contiguous intervals covering `[0, duration)`.
pub fn intervals_cover_duration(intervals: &[SceneInterval], duration: f64) -> bool {
    if intervals.is_empty() {
        return false;
    }
    if intervals[0].start_time != 0.0 {
        return false;
    }
    for pair in intervals.windows(2) {
        if pair[0].end_time != pair[1].start_time {
            return false;
        }
    }
    for (i, interval) in intervals.iter().enumerate() {
        if interval.ordinal != i as u32 || interval.start_time >= interval.end_time {
            return false;
        }
    }
    (intervals.last().unwrap().end_time - duration).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(ordinal: u32, start: f64, end: f64) -> SceneInterval {
        SceneInterval {
            ordinal,
            start_time: start,
            end_time: end,
            representative_frame: FrameInfo {
                index: ordinal,
                timestamp: start,
            },
        }
    }

    #[test]
    fn test_overlap_is_half_open() {
        let scene = interval(0, 0.0, 3.0);
        assert!(scene.overlaps(2.5, 4.0));
        assert!(scene.overlaps(0.0, 2.0));
        // Touching at the boundary is not an overlap
        assert!(!scene.overlaps(3.0, 5.0));
    }

    #[test]
    fn test_intervals_cover_duration() {
        let intervals = vec![interval(0, 0.0, 3.0), interval(1, 3.0, 5.0)];
        assert!(intervals_cover_duration(&intervals, 5.0));
        assert!(!intervals_cover_duration(&intervals, 6.0));
        assert!(!intervals_cover_duration(&[], 5.0));
    }

    #[test]
    fn test_gap_breaks_invariant() {
        let intervals = vec![interval(0, 0.0, 2.0), interval(1, 2.5, 5.0)];
        assert!(!intervals_cover_duration(&intervals, 5.0));
    }
}
