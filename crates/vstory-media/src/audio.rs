//! Audio track extraction for speech recognition.

use std::path::Path;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Sample rate expected by the ASR collaborator.
const ASR_SAMPLE_RATE: u32 = 16000;

/// Extract the audio track as 16 kHz mono WAV, the format the ASR
/// collaborator expects.
pub async fn extract_audio(
    video_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> MediaResult<()> {
    let cmd = FfmpegCommand::new(video_path.as_ref(), output_path.as_ref())
        .no_video()
        .audio_codec("pcm_s16le")
        .audio_channels(1)
        .audio_rate(ASR_SAMPLE_RATE)
        .log_level("error");

    FfmpegRunner::new().run(&cmd).await
}
