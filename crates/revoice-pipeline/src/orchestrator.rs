//! The five-stage voice-swap pipeline.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use revoice_media::{extract_audio, mix_stems, replace_audio, FfmpegRunner, StemSeparator};
use revoice_models::JobId;
use revoice_voice::SpeechToSpeechClient;

use crate::artifacts::JobWorkspace;
use crate::error::{PipelineError, PipelineResult};
use crate::stage::PipelineStage;

/// Runs one job through extract → separate → convert → mix → mux.
///
/// Execution is strictly sequential on the calling task: no stage starts
/// before its predecessor's output artifact exists and is non-empty, and
/// the first failure aborts everything downstream. There is no retry and
/// no in-flight cancellation; a started job runs to `Done` or to an error.
pub struct VoiceSwapPipeline {
    runner: FfmpegRunner,
    separator: StemSeparator,
    voice: SpeechToSpeechClient,
}

impl VoiceSwapPipeline {
    pub fn new(
        runner: FfmpegRunner,
        separator: StemSeparator,
        voice: SpeechToSpeechClient,
    ) -> Self {
        Self {
            runner,
            separator,
            voice,
        }
    }

    /// Run the full pipeline for an uploaded video already stored in
    /// `workspace`. Returns the path of the final muxed video.
    pub async fn run(
        &self,
        job_id: &JobId,
        workspace: &JobWorkspace,
        voice_id: &str,
    ) -> PipelineResult<PathBuf> {
        let mut stage = PipelineStage::Received;
        info!(job_id = %job_id, stage = %stage, voice_id, "Pipeline started");

        extract_audio(
            &self.runner,
            workspace.upload_path(),
            workspace.original_audio(),
        )
        .await?;
        stage = self
            .advance(job_id, stage, PipelineStage::AudioExtracted, &workspace.original_audio())
            .await?;

        // The model run blocks the whole job; conversion must not start
        // until every stem is on disk.
        let stems = self
            .separator
            .separate(&workspace.original_audio(), &workspace.separation_dir())
            .await?;
        stage = self
            .advance(job_id, stage, PipelineStage::Separated, stems.vocals())
            .await?;

        if let Err(e) = self
            .voice
            .convert(stems.vocals(), voice_id, workspace.converted_vocals())
            .await
        {
            if e.is_api_rejection() {
                error!(job_id = %job_id, voice_id, "Conversion rejected by remote service: {}", e);
            }
            return Err(e.into());
        }
        stage = self
            .advance(job_id, stage, PipelineStage::VocalsConverted, &workspace.converted_vocals())
            .await?;

        mix_stems(
            &self.runner,
            workspace.converted_vocals(),
            &stems.accompaniment(),
            workspace.final_audio(),
        )
        .await?;
        stage = self
            .advance(job_id, stage, PipelineStage::AudioMixed, &workspace.final_audio())
            .await?;

        replace_audio(
            &self.runner,
            workspace.upload_path(),
            workspace.final_audio(),
            workspace.output_video(),
        )
        .await?;
        stage = self
            .advance(job_id, stage, PipelineStage::VideoMuxed, &workspace.output_video())
            .await?;

        info!(
            job_id = %job_id,
            from = %stage,
            stage = %PipelineStage::Done,
            "Pipeline complete: {}",
            workspace.output_video().display()
        );

        Ok(workspace.output_video())
    }

    /// Gate a stage transition on its output artifact, then log it.
    async fn advance(
        &self,
        job_id: &JobId,
        from: PipelineStage,
        to: PipelineStage,
        artifact: &Path,
    ) -> PipelineResult<PipelineStage> {
        ensure_artifact(to, artifact).await?;
        info!(job_id = %job_id, from = %from, stage = %to, "Stage complete");
        Ok(to)
    }
}

/// Verify a stage's output artifact exists and is non-empty.
async fn ensure_artifact(stage: PipelineStage, path: &Path) -> PipelineResult<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.len() > 0 => Ok(()),
        _ => Err(PipelineError::MissingArtifact {
            stage,
            path: path.to_path_buf(),
        }),
    }
}
