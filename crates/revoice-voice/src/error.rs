//! Voice client error types.

use thiserror::Error;

pub type VoiceResult<T> = Result<T, VoiceError>;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Speech-to-speech API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to encode voice settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoiceError {
    /// Whether the remote service rejected the request (as opposed to a
    /// transport or local failure).
    pub fn is_api_rejection(&self) -> bool {
        matches!(self, VoiceError::Api { .. })
    }
}
