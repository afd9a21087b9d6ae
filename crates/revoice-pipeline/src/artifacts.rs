//! Per-job artifact workspace.
//!
//! Every job gets its own root directory named after its generated
//! `JobId`, so concurrent uploads that happen to share a filename never
//! touch each other's artifacts. Inside a root, each stage path is a pure
//! function of the upload's base name.

use std::path::{Path, PathBuf};

use revoice_models::JobId;

use crate::cleanup::CleanupPlan;
use crate::error::PipelineResult;

/// Resolves and owns the artifact paths of one job.
#[derive(Debug, Clone)]
pub struct JobWorkspace {
    root: PathBuf,
    video_filename: String,
    base_name: String,
}

impl JobWorkspace {
    /// Create the workspace directories for a job.
    ///
    /// `original_filename` is the name the client supplied for the upload;
    /// it is sanitized before any path is derived from it.
    pub async fn create(
        work_dir: impl AsRef<Path>,
        job_id: &JobId,
        original_filename: &str,
    ) -> PipelineResult<Self> {
        let video_filename = sanitize_filename(original_filename);
        let base_name = Path::new(&video_filename)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| video_filename.clone());

        let root = work_dir.as_ref().join(job_id.as_str());
        tokio::fs::create_dir_all(root.join("uploads")).await?;

        Ok(Self {
            root,
            video_filename,
            base_name,
        })
    }

    /// The job's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base name all stage paths are derived from.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Where the uploaded video is stored.
    pub fn upload_path(&self) -> PathBuf {
        self.root.join("uploads").join(&self.video_filename)
    }

    /// The extracted audio track.
    pub fn original_audio(&self) -> PathBuf {
        self.root
            .join(format!("{}_original_audio.mp3", self.base_name))
    }

    /// The directory the separator is asked to write stems into.
    pub fn separation_dir(&self) -> PathBuf {
        self.root
            .join("output")
            .join(format!("{}_original_audio", self.base_name))
    }

    /// The converted vocal track returned by the remote service.
    pub fn converted_vocals(&self) -> PathBuf {
        self.root
            .join(format!("{}_modified_vocals.mp3", self.base_name))
    }

    /// The remixed audio (converted vocals + instrumental stems).
    pub fn final_audio(&self) -> PathBuf {
        self.root.join(format!("{}_final_audio.mp3", self.base_name))
    }

    /// The final muxed video.
    pub fn output_video(&self) -> PathBuf {
        self.root
            .join(format!("{}_output_video.mp4", self.base_name))
    }

    /// Filename offered to the client for download.
    pub fn download_name(&self) -> String {
        format!("{}_output_video.mp4", self.base_name)
    }

    /// Everything this job may leave on disk, for the cleanup scheduler.
    ///
    /// The job root comes last so the per-file removals run first and the
    /// recursive root removal sweeps whatever remains.
    pub fn cleanup_plan(&self) -> CleanupPlan {
        CleanupPlan {
            files: vec![
                self.upload_path(),
                self.original_audio(),
                self.converted_vocals(),
                self.final_audio(),
                self.output_video(),
            ],
            dirs: vec![self.separation_dir(), self.root.clone()],
        }
    }
}

/// Strip path components and hostile characters from a client-supplied
/// filename.
fn sanitize_filename(name: &str) -> String {
    let last_component = name
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .next_back()
        .unwrap_or("");

    let sanitized: String = last_component
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .take(100)
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "upload.mp4".to_string()
    } else {
        sanitized
    }
}
