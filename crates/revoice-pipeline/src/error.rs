//! Pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::stage::PipelineStage;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} stage produced no usable output at {path}")]
    MissingArtifact {
        stage: PipelineStage,
        path: PathBuf,
    },

    #[error("Media stage failed: {0}")]
    Media(#[from] revoice_media::MediaError),

    #[error("Voice conversion failed: {0}")]
    Voice(#[from] revoice_voice::VoiceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
