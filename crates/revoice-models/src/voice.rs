//! Static voice catalog.
//!
//! Maps human-readable labels to the opaque voice IDs understood by the
//! remote speech-to-speech service. The catalog is read-only; whether an ID
//! is actually valid is decided by the remote service, not here.

use serde::Serialize;

/// One selectable voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceOption {
    /// Label shown to the user (name, gender, style).
    pub label: &'static str,
    /// Opaque identifier passed to the remote service.
    pub voice_id: &'static str,
}

const VOICES: &[VoiceOption] = &[
    VoiceOption {
        label: "Rachel Voice, Female, Corporate",
        voice_id: "EXAVITQu4vr4xnSDxMaL",
    },
    VoiceOption {
        label: "Seraphina, Female, Teenage",
        voice_id: "AZnzlk1XvdvUeBnXmlld",
    },
    VoiceOption {
        label: "Antony, Male, Rigid",
        voice_id: "ErXwobaYiN019PkySvjV",
    },
    VoiceOption {
        label: "Joseph, Male, Commercials",
        voice_id: "UuDE0Ki4TEAyPHmuPW9p",
    },
    VoiceOption {
        label: "Jeff, Male, Storytelling",
        voice_id: "nWyi64I3m632IQdDOTzM",
    },
    VoiceOption {
        label: "Samad, Male, Hindi",
        voice_id: "rW2lcIFbB5AVdzWcOG9n",
    },
];

/// The full voice catalog, in display order.
pub fn voice_catalog() -> &'static [VoiceOption] {
    VOICES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_six_voices() {
        assert_eq!(voice_catalog().len(), 6);
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<_> = voice_catalog().iter().map(|v| v.voice_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), voice_catalog().len());
    }

    #[test]
    fn test_known_voice_present() {
        assert!(voice_catalog()
            .iter()
            .any(|v| v.voice_id == "EXAVITQu4vr4xnSDxMaL"));
    }
}
