//! Audio extraction from video files.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_media;

/// Extract the audio track of a video into a standalone mp3 file.
///
/// The input is probed first so a video without an audio stream fails with
/// a descriptive error instead of an opaque FFmpeg exit code.
pub async fn extract_audio(
    runner: &FfmpegRunner,
    video: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let video = video.as_ref();
    let output = output.as_ref();

    let info = probe_media(video).await?;
    if !info.has_audio {
        return Err(MediaError::NoAudioStream(video.to_path_buf()));
    }

    info!(
        "Extracting audio: {} -> {}",
        video.display(),
        output.display()
    );

    let cmd = FfmpegCommand::new(video, output)
        .no_video()
        .audio_codec("libmp3lame");

    runner.run(&cmd).await?;

    info!("Audio extracted: {}", output.display());
    Ok(())
}
