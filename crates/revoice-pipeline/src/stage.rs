//! Pipeline stage state machine.

use std::fmt;

/// Stages of the voice-swap pipeline, in execution order.
///
/// Transitions are strictly sequential; a failure at any point is the
/// absorbing error outcome and no later stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Received,
    AudioExtracted,
    Separated,
    VocalsConverted,
    AudioMixed,
    VideoMuxed,
    Done,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::AudioExtracted => "audio_extracted",
            PipelineStage::Separated => "separated",
            PipelineStage::VocalsConverted => "vocals_converted",
            PipelineStage::AudioMixed => "audio_mixed",
            PipelineStage::VideoMuxed => "video_muxed",
            PipelineStage::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Done)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
