//! FFmpeg CLI wrapper, scene segmentation and storyboard rendering.
//!
//! This crate provides:
//! - Type-safe FFmpeg/FFprobe command building and execution
//! - Fixed-rate frame sampling and audio extraction
//! - Histogram-correlation scene boundary detection
//! - The storyboard compositor (grid layout, text wrap, panel rendering)

pub mod audio;
pub mod command;
pub mod compositor;
pub mod error;
pub mod frames;
pub mod histogram;
pub mod probe;
pub mod segmenter;

pub use audio::extract_audio;
pub use command::{FfmpegCommand, FfmpegRunner};
pub use compositor::{Compositor, CompositorConfig, PanelInput};
pub use error::{MediaError, MediaResult};
pub use frames::{sample_frames, Frame};
pub use histogram::ColorHistogram;
pub use probe::{probe_video, VideoInfo};
pub use segmenter::{segment_scenes, SegmentedScene, SegmenterConfig};
