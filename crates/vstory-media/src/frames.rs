//! Fixed-rate frame sampling.
//!
//! Decodes a finite video into a sequence of timestamped raster frames by
//! running FFmpeg with an `fps` filter into a working directory and loading
//! the resulting images. One pass, no seeking.

use std::path::Path;

use image::RgbImage;
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// One sampled frame, owned by the frame source until handed off.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Index in the sampled sequence
    pub index: u32,
    /// Timestamp in seconds
    pub timestamp: f64,
    /// Decoded raster
    pub image: RgbImage,
}

/// Sample frames from a video at a fixed interval (seconds between frames).
///
/// Frames land in `frames_dir` as a PNG sequence and are loaded in order.
/// A video shorter than one sampling step yields a single frame. Producing
/// no frames at all is a decode error.
pub async fn sample_frames(
    video_path: impl AsRef<Path>,
    frames_dir: impl AsRef<Path>,
    interval: f64,
) -> MediaResult<Vec<Frame>> {
    let video_path = video_path.as_ref();
    let frames_dir = frames_dir.as_ref();

    if !video_path.exists() {
        return Err(MediaError::FileNotFound(video_path.to_path_buf()));
    }
    std::fs::create_dir_all(frames_dir)?;

    let pattern = frames_dir.join("frame_%05d.png");
    let cmd = FfmpegCommand::new(video_path, &pattern)
        .video_filter(format!("fps=1/{}", interval))
        .no_audio()
        .log_level("error");

    FfmpegRunner::new().run(&cmd).await.map_err(|e| match e {
        // A failed decode of the only input is fatal to the run
        MediaError::FfmpegFailed { stderr, .. } => MediaError::decode_failed(format!(
            "FFmpeg could not decode {}: {}",
            video_path.display(),
            stderr.unwrap_or_default().trim()
        )),
        other => other,
    })?;

    let mut paths: Vec<_> = std::fs::read_dir(frames_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map(|e| e == "png").unwrap_or(false))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(MediaError::decode_failed(format!(
            "No frames decoded from {}",
            video_path.display()
        )));
    }

    let mut frames = Vec::with_capacity(paths.len());
    for (index, path) in paths.iter().enumerate() {
        let image = image::open(path)?.to_rgb8();
        frames.push(Frame {
            index: index as u32,
            // The fps filter emits the first frame at t=0, then one per interval
            timestamp: index as f64 * interval,
            image,
        });
    }

    info!(
        count = frames.len(),
        interval, "Sampled frames from {}", video_path.display()
    );
    debug!(first = ?frames.first().map(|f| f.timestamp), last = ?frames.last().map(|f| f.timestamp), "Frame timestamps");

    Ok(frames)
}
