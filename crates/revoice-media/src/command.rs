//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Builder for FFmpeg commands.
///
/// Unlike a plain argument list, the builder keeps inputs ordered: filter
/// indices (`[0:a]`, `[1:a]`, ...) refer to inputs in the order they were
/// added.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file paths, in `-i` order
    inputs: Vec<PathBuf>,
    /// Output file path
    output: PathBuf,
    /// Output arguments (after the inputs)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command with a single input.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            inputs: vec![input.as_ref().to_path_buf()],
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add another input file.
    pub fn input(mut self, input: impl AsRef<Path>) -> Self {
        self.inputs.push(input.as_ref().to_path_buf());
        self
    }

    /// Add an output argument (after the inputs).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Drop the video stream (audio-only output).
    pub fn no_video(self) -> Self {
        self.output_arg("-vn")
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set the number of output audio channels.
    pub fn audio_channels(self, channels: u8) -> Self {
        self.output_arg("-ac").output_arg(channels.to_string())
    }

    /// Set filter complex.
    pub fn filter_complex(self, filter: impl Into<String>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    /// Copy the video stream without re-encoding.
    pub fn copy_video(self) -> Self {
        self.output_arg("-c:v").output_arg("copy")
    }

    /// Map a stream selector into the output.
    pub fn map(self, selector: impl Into<String>) -> Self {
        self.output_arg("-map").output_arg(selector)
    }

    /// Truncate the output to the shortest input stream.
    pub fn shortest(self) -> Self {
        self.output_arg("-shortest")
    }

    /// The output path this command writes.
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().to_string());
        }

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with stderr capture and a bounded timeout.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRunner {
    /// Timeout in seconds
    timeout_secs: Option<u64>,
}

impl FfmpegRunner {
    /// Create a new runner with no timeout.
    pub fn new() -> Self {
        Self { timeout_secs: None }
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command to completion.
    ///
    /// Verifies the output file exists and is non-empty before returning,
    /// so a "successful" run can never hand downstream stages a truncated
    /// artifact.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut command = Command::new("ffmpeg");
        command.args(&args);

        let (status, stderr) = run_captured(command, self.timeout_secs).await?;

        if !status.success() {
            return Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some(stderr),
                status.code(),
            ));
        }

        verify_output(cmd.output_path()).await
    }
}

/// Spawn a command with piped stdio, wait for it with an optional timeout,
/// and return the exit status along with captured stderr.
///
/// On timeout the child is killed before returning `MediaError::Timeout`.
pub(crate) async fn run_captured(
    mut command: Command,
    timeout_secs: Option<u64>,
) -> MediaResult<(std::process::ExitStatus, String)> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    let stderr = child.stderr.take().expect("stderr not captured");
    let mut reader = BufReader::new(stderr).lines();

    let stderr_handle = tokio::spawn(async move {
        let mut lines = Vec::new();
        while let Ok(Some(line)) = reader.next_line().await {
            lines.push(line);
        }
        lines.join("\n")
    });

    let status = wait_for_completion(&mut child, timeout_secs).await;

    let stderr_text = stderr_handle.await.unwrap_or_default();

    Ok((status?, stderr_text))
}

/// Wait for a child process, killing it if the timeout elapses.
async fn wait_for_completion(
    child: &mut Child,
    timeout_secs: Option<u64>,
) -> MediaResult<std::process::ExitStatus> {
    match timeout_secs {
        Some(secs) => {
            match tokio::time::timeout(Duration::from_secs(secs), child.wait()).await {
                Ok(result) => Ok(result?),
                Err(_) => {
                    warn!("External tool timed out after {} seconds, killing process", secs);
                    let _ = child.kill().await;
                    Err(MediaError::Timeout(secs))
                }
            }
        }
        None => Ok(child.wait().await?),
    }
}

/// Verify that a tool actually wrote its output file.
pub(crate) async fn verify_output(path: &Path) -> MediaResult<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.len() > 0 => Ok(()),
        Ok(_) => Err(MediaError::EmptyOutput(path.to_path_buf())),
        Err(_) => Err(MediaError::FileNotFound(path.to_path_buf())),
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_input_args() {
        let cmd = FfmpegCommand::new("in.mp4", "out.mp3")
            .no_video()
            .audio_codec("libmp3lame");

        let args = cmd.build_args();
        assert_eq!(args[0], "-y");
        assert!(args.contains(&"-vn".to_string()));
        assert!(args.contains(&"libmp3lame".to_string()));
        assert_eq!(args.last().unwrap(), "out.mp3");
    }

    #[test]
    fn test_inputs_keep_order() {
        let cmd = FfmpegCommand::new("a.mp3", "out.mp3")
            .input("b.mp3")
            .input("c.mp3");

        let args = cmd.build_args();
        let input_positions: Vec<_> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "-i")
            .map(|(i, _)| args[i + 1].clone())
            .collect();
        assert_eq!(input_positions, vec!["a.mp3", "b.mp3", "c.mp3"]);
    }

    #[test]
    fn test_mux_style_args() {
        let cmd = FfmpegCommand::new("video.mp4", "out.mp4")
            .input("audio.mp3")
            .copy_video()
            .map("0:v:0")
            .map("1:a:0")
            .shortest();

        let args = cmd.build_args();
        assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "copy"));
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "0:v:0"));
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "1:a:0"));
        assert!(args.contains(&"-shortest".to_string()));
    }

    #[tokio::test]
    async fn test_verify_output_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.mp3");
        assert!(matches!(
            verify_output(&missing).await,
            Err(MediaError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_output_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let empty = dir.path().join("empty.mp3");
        tokio::fs::write(&empty, b"").await.unwrap();
        assert!(matches!(
            verify_output(&empty).await,
            Err(MediaError::EmptyOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_output_ok() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("some.mp3");
        tokio::fs::write(&file, b"data").await.unwrap();
        assert!(verify_output(&file).await.is_ok());
    }
}
