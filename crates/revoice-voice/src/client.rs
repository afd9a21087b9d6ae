//! Speech-to-speech API client.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Serialize;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{VoiceError, VoiceResult};

/// Production endpoint; tests point the client at a local mock server.
pub const DEFAULT_API_BASE_URL: &str = "https://api.elevenlabs.io";

/// Model identifier sent with every conversion request.
const STS_MODEL_ID: &str = "eleven_multilingual_sts_v2";

/// Voice rendering parameters.
///
/// These are fixed service-wide; the API accepts them as a JSON-encoded
/// form field.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
    pub style: f64,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.8,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

/// Client for the remote speech-to-speech service.
pub struct SpeechToSpeechClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl SpeechToSpeechClient {
    /// Create a new client with a bounded request timeout.
    pub fn new(api_key: impl Into<String>, timeout: Option<Duration>) -> VoiceResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: api_key.into(),
            http: builder.build()?,
        })
    }

    /// Override the API base URL (used by tests to target a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Convert the vocal track at `vocals` into the voice identified by
    /// `voice_id`, writing the converted audio to `output`.
    ///
    /// The vocal file is streamed up as a multipart field and the response
    /// body is streamed down chunk by chunk; neither side is buffered
    /// whole in memory. Whether `voice_id` is valid is the remote
    /// service's call — an unknown ID comes back as a non-success status.
    pub async fn convert(
        &self,
        vocals: impl AsRef<Path>,
        voice_id: &str,
        output: impl AsRef<Path>,
    ) -> VoiceResult<()> {
        let vocals = vocals.as_ref();
        let output = output.as_ref();

        let file = File::open(vocals).await?;
        let file_len = file.metadata().await?.len();
        let file_name = vocals
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "vocals.mp3".to_string());

        let audio_part = Part::stream_with_length(Body::from(file), file_len)
            .file_name(file_name)
            .mime_str("audio/mpeg")?;

        let form = Form::new()
            .text("model_id", STS_MODEL_ID)
            .text(
                "voice_settings",
                serde_json::to_string(&VoiceSettings::default())?,
            )
            .part("audio", audio_part);

        let url = format!(
            "{}/v1/speech-to-speech/{}/stream",
            self.base_url, voice_id
        );

        debug!(voice_id, "Uploading vocals for conversion ({} bytes)", file_len);

        let response = self
            .http
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(voice_id, %status, "Speech-to-speech conversion rejected: {}", body);
            return Err(VoiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        // Stream the converted audio to disk as it arrives.
        let mut out = File::create(output).await?;
        let mut response = response;
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            out.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        out.flush().await?;

        info!(
            voice_id,
            "Converted vocals saved: {} ({} bytes)",
            output.display(),
            written
        );
        Ok(())
    }
}
