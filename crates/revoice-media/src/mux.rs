//! Audio/video muxing.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Replace a video's audio track with `audio`, copying the video stream.
///
/// The video is not re-encoded; the output is truncated to the shorter of
/// the two input streams.
pub async fn replace_audio(
    runner: &FfmpegRunner,
    video: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let video = video.as_ref();
    let audio = audio.as_ref();
    let output = output.as_ref();

    info!(
        "Muxing {} + {} -> {}",
        video.display(),
        audio.display(),
        output.display()
    );

    let cmd = FfmpegCommand::new(video, output)
        .input(audio)
        .copy_video()
        .map("0:v:0")
        .map("1:a:0")
        .shortest();

    runner.run(&cmd).await?;

    info!("Output video written: {}", output.display());
    Ok(())
}
