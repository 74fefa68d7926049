//! One storyboard run, end to end.
//!
//! Frame source -> segmenter -> {aligner, visual captioning} -> fusion ->
//! compositor. All intermediates are scoped to the run and handed forward
//! by value; two concurrent runs over different videos share nothing.

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{info, warn};

use vstory_media::compositor::{Compositor, CompositorConfig, PanelInput};
use vstory_media::segmenter::{segment_scenes, SegmentedScene, SegmenterConfig};
use vstory_media::{extract_audio, probe_video, sample_frames};
use vstory_ml_client::MlClient;
use vstory_models::timestamp::format_span;
use vstory_models::{RunId, SceneCaption, StoryboardRecord, TranscriptFragment};

use crate::align::align_transcripts;
use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::fanout::ordered_fan_out;
use crate::fusion::FusionPolicy;
use crate::logging::RunLogger;

/// Everything one run produces: the composed raster and the structured
/// record session storage persists alongside it.
pub struct RunOutput {
    pub record: StoryboardRecord,
    pub storyboard: RgbImage,
}

/// Run the full pipeline over one video.
///
/// `workdir` receives the sampled frames, the extracted audio track and one
/// saved representative frame per scene; the caller owns its lifetime.
pub async fn run_pipeline(
    config: &PipelineConfig,
    ml: &MlClient,
    video_path: &Path,
    workdir: &Path,
) -> PipelineResult<RunOutput> {
    config.validate()?;
    let run_id = RunId::new();
    let logger = RunLogger::new(&run_id);

    // Decode failures are the only fatal outcome: no frames, no pipeline.
    let video = probe_video(video_path).await?;
    logger.stage(
        "probe",
        &format!(
            "{} ({}x{}, {:.1}s)",
            video_path.display(),
            video.width,
            video.height,
            video.duration
        ),
    );

    let frames = sample_frames(video_path, &workdir.join("frames"), config.sample_interval).await?;
    logger.stage("frames", &format!("{} sampled frames", frames.len()));

    let scenes = segment_scenes(
        frames,
        video.duration,
        &SegmenterConfig {
            threshold: config.scene_threshold,
            max_scenes: config.max_scenes,
        },
    )?;
    for scene in &scenes {
        info!(
            scene = scene.interval.ordinal,
            span = %format_span(scene.interval.start_time, scene.interval.end_time),
            "Detected scene"
        );
    }
    logger.stage("segment", &format!("{} scenes", scenes.len()));

    let frame_paths = save_representative_frames(&scenes, workdir, &logger)?;

    // ASR over the whole audio track; a failed collaborator degrades every
    // scene to visual-only rather than aborting the run.
    let fragments = transcribe_audio(ml, &video, video_path, workdir, &logger).await;
    let intervals: Vec<_> = scenes.iter().map(|s| s.interval.clone()).collect();
    let transcripts = align_transcripts(&intervals, &fragments);
    logger.stage(
        "align",
        &format!(
            "{} scene transcripts ({} silent)",
            transcripts.len(),
            transcripts.iter().filter(|t| t.is_empty).count()
        ),
    );

    // Per-scene visual captioning, bounded pool, reassembled in scene order.
    let visual_captions = {
        let logger = &logger;
        let frame_paths = &frame_paths;
        ordered_fan_out(scenes.len(), config.max_scene_parallel, |i| async move {
            // A frame that never reached disk has nothing to caption
            let Some(path) = frame_paths[i].as_ref() else {
                return String::new();
            };
            match ml.caption(path).await {
                Ok(caption) => caption,
                Err(e) => {
                    logger.degraded("caption", i as u32, &format!("visual captioning failed: {}", e));
                    String::new()
                }
            }
        })
        .await
    };

    let policy = FusionPolicy {
        min_speech_words: config.min_speech_words,
        max_caption_chars: config.max_caption_chars,
    };
    let decisions: Vec<_> = visual_captions
        .iter()
        .zip(&transcripts)
        .map(|(visual, transcript)| policy.decide(visual, transcript))
        .collect();

    // Rewriting fans out the same way; failures fall back per scene.
    let captions: Vec<SceneCaption> = {
        let logger = &logger;
        let policy = &policy;
        let decisions = &decisions;
        let visual_captions = &visual_captions;
        ordered_fan_out(scenes.len(), config.max_scene_parallel, |i| async move {
            let rewritten = match ml
                .rewrite(&decisions[i].rewrite_context, policy.max_caption_chars)
                .await
            {
                Ok(text) => Some(text),
                Err(e) => {
                    logger.degraded("rewrite", i as u32, &format!("using fallback caption: {}", e));
                    None
                }
            };
            policy.finalize(decisions[i].clone(), rewritten, &visual_captions[i], i as u32)
        })
        .await
    };
    logger.stage("fusion", &format!("{} captions", captions.len()));

    let compositor = Compositor::new(CompositorConfig {
        columns: config.columns,
        font_path: config.font_path.clone(),
        ..CompositorConfig::default()
    })?;
    let panels: Vec<PanelInput<'_>> = scenes
        .iter()
        .zip(&captions)
        .zip(&frame_paths)
        .map(|((scene, caption), path)| PanelInput {
            // Scenes whose frame could not be persisted render as placeholders
            image: path.as_ref().map(|_| &scene.representative),
            caption: &caption.fused_text,
        })
        .collect();
    let storyboard = compositor.compose(&panels)?;
    logger.stage(
        "compose",
        &format!("{}x{} canvas", storyboard.width(), storyboard.height()),
    );

    let record = StoryboardRecord::assemble(
        run_id,
        video_path.to_string_lossy(),
        video.duration,
        intervals,
        transcripts,
        captions,
    );

    Ok(RunOutput { record, storyboard })
}

/// Save each scene's representative frame for the captioning collaborator
/// and for session storage.
///
/// A scene whose frame cannot be written yields `None` and degrades to a
/// placeholder panel with no visual caption; only a failure to create the
/// scenes directory itself aborts the run.
fn save_representative_frames(
    scenes: &[SegmentedScene],
    workdir: &Path,
    logger: &RunLogger,
) -> PipelineResult<Vec<Option<PathBuf>>> {
    let scenes_dir = workdir.join("scenes");
    std::fs::create_dir_all(&scenes_dir)?;

    let mut paths = Vec::with_capacity(scenes.len());
    for scene in scenes {
        let path = scenes_dir.join(format!("scene_{:03}.png", scene.interval.ordinal + 1));
        match scene.representative.save(&path) {
            Ok(()) => paths.push(Some(path)),
            Err(e) => {
                logger.degraded(
                    "frames",
                    scene.interval.ordinal,
                    &format!("could not persist representative frame: {}", e),
                );
                paths.push(None);
            }
        }
    }
    Ok(paths)
}

/// Extract the audio track and transcribe it. Any failure yields an empty
/// fragment list; every scene then aligns as silent.
async fn transcribe_audio(
    ml: &MlClient,
    video: &vstory_media::VideoInfo,
    video_path: &Path,
    workdir: &Path,
    logger: &RunLogger,
) -> Vec<TranscriptFragment> {
    if !video.has_audio {
        logger.stage("transcribe", "no audio track, all scenes silent");
        return Vec::new();
    }

    let audio_path = workdir.join("audio.wav");
    if let Err(e) = extract_audio(video_path, &audio_path).await {
        warn!(error = %e, "Audio extraction failed, proceeding without transcript");
        return Vec::new();
    }

    match ml.transcribe(&audio_path).await {
        Ok(fragments) => {
            logger.stage("transcribe", &format!("{} fragments", fragments.len()));
            fragments
        }
        Err(e) => {
            warn!(error = %e, "Transcription failed, proceeding without transcript");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use vstory_models::{FrameInfo, SceneInterval};

    fn scene(ordinal: u32) -> SegmentedScene {
        SegmentedScene {
            interval: SceneInterval {
                ordinal,
                start_time: ordinal as f64,
                end_time: ordinal as f64 + 1.0,
                representative_frame: FrameInfo {
                    index: ordinal,
                    timestamp: ordinal as f64,
                },
            },
            representative: RgbImage::from_pixel(4, 4, Rgb([10, 20, 30])),
        }
    }

    #[test]
    fn test_saved_frames_keep_scene_order() {
        let workdir = tempfile::tempdir().unwrap();
        let scenes = [scene(0), scene(1), scene(2)];
        let logger = RunLogger::new(&vstory_models::RunId::new());

        let paths = save_representative_frames(&scenes, workdir.path(), &logger).unwrap();
        assert_eq!(paths.len(), 3);
        for (i, path) in paths.iter().enumerate() {
            let path = path.as_ref().unwrap();
            assert!(path.exists());
            assert!(path.ends_with(format!("scene_{:03}.png", i + 1)));
        }
    }

    #[test]
    fn test_unwritable_frame_degrades_instead_of_aborting() {
        let workdir = tempfile::tempdir().unwrap();
        // A directory squatting on scene_001.png makes that one save fail
        std::fs::create_dir_all(workdir.path().join("scenes").join("scene_001.png")).unwrap();

        let scenes = [scene(0), scene(1)];
        let logger = RunLogger::new(&vstory_models::RunId::new());

        let paths = save_representative_frames(&scenes, workdir.path(), &logger).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].is_none());
        assert!(paths[1].as_ref().unwrap().exists());
    }
}
