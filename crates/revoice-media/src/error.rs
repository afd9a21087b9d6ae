//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while driving the external media tools.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("Stem separator '{0}' not found in PATH")]
    SeparatorNotFound(String),

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Stem separation failed: {message}")]
    SeparationFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("Separation produced no output in {0}")]
    SeparationNoOutput(PathBuf),

    #[error("Missing stem '{name}' at {path}")]
    MissingStem { name: String, path: PathBuf },

    #[error("No audio stream in {0}")]
    NoAudioStream(PathBuf),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Tool produced an empty output file: {0}")]
    EmptyOutput(PathBuf),

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a separation failure error.
    pub fn separation_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::SeparationFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    pub fn missing_stem(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingStem {
            name: name.into(),
            path: path.into(),
        }
    }
}
