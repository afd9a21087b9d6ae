//! Application state.

use std::sync::Arc;

use revoice_media::{FfmpegRunner, SeparatorConfig, StemSeparator};
use revoice_pipeline::{CleanupScheduler, VoiceSwapPipeline};
use revoice_voice::SpeechToSpeechClient;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pipeline: Arc<VoiceSwapPipeline>,
    pub cleanup: Arc<CleanupScheduler>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        if config.voice_api_key.is_empty() {
            return Err("ELEVENLABS_API_KEY not set".into());
        }

        let runner = FfmpegRunner::new().with_timeout(config.ffmpeg_timeout_secs);

        let separator = StemSeparator::new(SeparatorConfig {
            binary: config.separator_bin.clone(),
            disable_gpu: config.disable_gpu,
            timeout_secs: Some(config.separation_timeout_secs),
            ..SeparatorConfig::default()
        });

        let mut voice =
            SpeechToSpeechClient::new(config.voice_api_key.clone(), Some(config.voice_timeout))?;
        if let Some(url) = &config.voice_api_url {
            voice = voice.with_base_url(url.clone());
        }

        let pipeline = VoiceSwapPipeline::new(runner, separator, voice);
        let cleanup = CleanupScheduler::new(config.cleanup_delay);

        Ok(Self {
            config,
            pipeline: Arc::new(pipeline),
            cleanup: Arc::new(cleanup),
        })
    }
}
