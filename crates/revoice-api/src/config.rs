//! Server configuration.
//!
//! Built once at startup from the environment and passed down explicitly;
//! nothing in the pipeline reads process-wide state after this point.

use std::path::PathBuf;
use std::time::Duration;

/// Process-wide configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Root directory for per-job artifact workspaces
    pub work_dir: PathBuf,
    /// Max request body size (the uploaded video)
    pub max_body_size: usize,
    /// Delay before a job's artifacts are deleted
    pub cleanup_delay: Duration,
    /// Speech-to-speech API key
    pub voice_api_key: String,
    /// Speech-to-speech API base URL override (tests)
    pub voice_api_url: Option<String>,
    /// Timeout for the remote conversion request
    pub voice_timeout: Duration,
    /// Timeout for each FFmpeg invocation, seconds
    pub ffmpeg_timeout_secs: u64,
    /// Separator executable
    pub separator_bin: String,
    /// Timeout for the separation run, seconds
    pub separation_timeout_secs: u64,
    /// Keep model inference off the GPU
    pub disable_gpu: bool,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            work_dir: PathBuf::from("work"),
            max_body_size: 512 * 1024 * 1024, // 512MB
            cleanup_delay: Duration::from_secs(5),
            voice_api_key: String::new(),
            voice_api_url: None,
            voice_timeout: Duration::from_secs(300),
            ffmpeg_timeout_secs: 600,
            separator_bin: "spleeter".to_string(),
            separation_timeout_secs: 1800,
            disable_gpu: true,
            environment: "development".to_string(),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: std::env::var("REVOICE_HOST").unwrap_or(defaults.host),
            port: env_parse("REVOICE_PORT", defaults.port),
            work_dir: std::env::var("REVOICE_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            max_body_size: env_parse("MAX_BODY_SIZE", defaults.max_body_size),
            cleanup_delay: Duration::from_secs(env_parse("CLEANUP_DELAY_SECS", 5)),
            voice_api_key: std::env::var("ELEVENLABS_API_KEY").unwrap_or_default(),
            voice_api_url: std::env::var("ELEVENLABS_API_URL").ok(),
            voice_timeout: Duration::from_secs(env_parse("VOICE_TIMEOUT_SECS", 300)),
            ffmpeg_timeout_secs: env_parse("FFMPEG_TIMEOUT_SECS", defaults.ffmpeg_timeout_secs),
            separator_bin: std::env::var("SEPARATOR_BIN").unwrap_or(defaults.separator_bin),
            separation_timeout_secs: env_parse(
                "SEPARATION_TIMEOUT_SECS",
                defaults.separation_timeout_secs,
            ),
            disable_gpu: std::env::var("DISABLE_GPU")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.disable_gpu),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
