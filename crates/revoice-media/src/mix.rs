//! Stem mixdown.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Mix the converted vocals with the instrumental stems into one stereo
/// audio file.
///
/// Inputs are summed with equal weight (`amix`) and the result runs for the
/// duration of the longest input. Every stem must be present up front; a
/// missing file fails the stage instead of silently mixing fewer inputs.
pub async fn mix_stems(
    runner: &FfmpegRunner,
    vocals: impl AsRef<Path>,
    accompaniment: &[&Path],
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let vocals = vocals.as_ref();
    let output = output.as_ref();

    for path in accompaniment.iter().copied().chain([vocals]) {
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }
    }

    info!(
        "Mixing {} stems + vocals -> {}",
        accompaniment.len(),
        output.display()
    );

    // Instrumental inputs first, vocals last; filter indices follow input
    // order.
    let mut inputs: Vec<PathBuf> = accompaniment.iter().map(|p| p.to_path_buf()).collect();
    inputs.push(vocals.to_path_buf());

    let mut cmd = FfmpegCommand::new(&inputs[0], output);
    for input in &inputs[1..] {
        cmd = cmd.input(input);
    }

    let cmd = cmd
        .filter_complex(amix_filter(inputs.len()))
        .audio_channels(2);

    runner.run(&cmd).await?;

    info!("Mixed audio written: {}", output.display());
    Ok(())
}

/// Build the `amix` filter for `n` audio inputs.
fn amix_filter(n: usize) -> String {
    let mut filter = String::new();
    for i in 0..n {
        filter.push_str(&format!("[{}:a]", i));
    }
    filter.push_str(&format!("amix=inputs={}:duration=longest", n));
    filter
}
