//! Histogram-correlation scene boundary detection.
//!
//! First-order Markov comparison: each sampled frame is compared only to the
//! immediately preceding one. A correlation drop below the sensitivity
//! threshold closes the current interval and opens the next. Correlations
//! are computed once per run; tightening the threshold to respect a scene
//! ceiling only re-derives boundaries from the stored series.

use image::RgbImage;
use tracing::{debug, info, warn};

use vstory_models::{FrameInfo, SceneInterval};

use crate::error::{MediaError, MediaResult};
use crate::frames::Frame;
use crate::histogram::ColorHistogram;

/// Segmenter tuning.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Sensitivity threshold in (0,1); correlation below it is a boundary
    pub threshold: f64,
    /// Optional ceiling on the scene count; exceeded ceilings tighten the
    /// threshold and re-derive boundaries instead of truncating
    pub max_scenes: Option<usize>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            max_scenes: None,
        }
    }
}

/// One detected scene: its interval plus the representative raster
/// (the first frame of the interval).
#[derive(Debug, Clone)]
pub struct SegmentedScene {
    pub interval: SceneInterval,
    pub representative: RgbImage,
}

/// Factor applied to the threshold on each tightening pass.
const THRESHOLD_TIGHTEN_FACTOR: f64 = 0.8;

/// Maximum tightening passes before accepting the ceiling overshoot.
const MAX_TIGHTEN_PASSES: u32 = 8;

/// Split sampled frames into ordered, contiguous scene intervals covering
/// `[0, duration)`.
///
/// The first frame always opens interval 0; the last interval always closes
/// at the video's true duration, not the last sampled timestamp. A video
/// with no detected boundary yields exactly one interval.
pub fn segment_scenes(
    frames: Vec<Frame>,
    duration: f64,
    config: &SegmenterConfig,
) -> MediaResult<Vec<SegmentedScene>> {
    if frames.is_empty() {
        return Err(MediaError::decode_failed("No frames to segment"));
    }
    if !(config.threshold > 0.0 && config.threshold < 1.0) {
        return Err(MediaError::InvalidVideo(format!(
            "Scene threshold must be in (0,1), got {}",
            config.threshold
        )));
    }

    // One histogram per frame, one correlation per consecutive pair.
    let histograms: Vec<ColorHistogram> = frames
        .iter()
        .map(|f| ColorHistogram::from_image(&f.image))
        .collect();
    let correlations: Vec<f64> = histograms
        .windows(2)
        .map(|pair| pair[0].correlation(&pair[1]))
        .collect();

    let mut threshold = config.threshold;
    let mut boundaries = boundaries_below(&correlations, threshold);

    if let Some(ceiling) = config.max_scenes {
        let mut passes = 0;
        while boundaries.len() + 1 > ceiling && passes < MAX_TIGHTEN_PASSES {
            threshold *= THRESHOLD_TIGHTEN_FACTOR;
            boundaries = boundaries_below(&correlations, threshold);
            passes += 1;
            debug!(
                threshold,
                scenes = boundaries.len() + 1,
                "Tightened scene threshold to respect ceiling"
            );
        }
        if boundaries.len() + 1 > ceiling {
            warn!(
                scenes = boundaries.len() + 1,
                ceiling, "Scene ceiling still exceeded after tightening"
            );
        }
    }

    let scenes = build_scenes(frames, &boundaries, duration);
    info!(
        scenes = scenes.len(),
        threshold, duration, "Scene segmentation complete"
    );

    debug_assert!(vstory_models::scene::intervals_cover_duration(
        &scenes.iter().map(|s| s.interval.clone()).collect::<Vec<_>>(),
        duration,
    ));

    Ok(scenes)
}

/// Frame indices that open a new interval (excluding index 0, which always
/// opens interval 0). `correlations[i]` compares frame `i` to frame `i + 1`.
fn boundaries_below(correlations: &[f64], threshold: f64) -> Vec<usize> {
    correlations
        .iter()
        .enumerate()
        .filter(|(_, &corr)| corr < threshold)
        .map(|(i, _)| i + 1)
        .collect()
}

fn build_scenes(frames: Vec<Frame>, boundaries: &[usize], duration: f64) -> Vec<SegmentedScene> {
    // Start index of every interval, in order.
    let mut starts = Vec::with_capacity(boundaries.len() + 1);
    starts.push(0usize);
    starts.extend_from_slice(boundaries);

    let mut images: Vec<Option<RgbImage>> = Vec::with_capacity(frames.len());
    let infos: Vec<FrameInfo> = frames
        .into_iter()
        .map(|f| {
            let info = FrameInfo {
                index: f.index,
                timestamp: f.timestamp,
            };
            images.push(Some(f.image));
            info
        })
        .collect();

    let mut scenes = Vec::with_capacity(starts.len());
    for (ordinal, &start_index) in starts.iter().enumerate() {
        let start_time = if ordinal == 0 {
            0.0
        } else {
            infos[start_index].timestamp
        };
        let end_time = match starts.get(ordinal + 1) {
            Some(&next) => infos[next].timestamp,
            // The final interval closes at the true duration
            None => duration,
        };

        scenes.push(SegmentedScene {
            interval: SceneInterval {
                ordinal: ordinal as u32,
                start_time,
                end_time,
                representative_frame: infos[start_index],
            },
            representative: images[start_index].take().expect("start indices are unique"),
        });
    }

    scenes
}
