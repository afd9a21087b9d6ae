//! Remote speech-to-speech conversion.
//!
//! This crate provides:
//! - A streaming client for the speech-to-speech HTTP API
//! - The fixed model/voice-settings constants the service is called with

pub mod client;
pub mod error;

pub use client::{SpeechToSpeechClient, VoiceSettings, DEFAULT_API_BASE_URL};
pub use error::{VoiceError, VoiceResult};
