//! Stem separation via the external separator CLI.
//!
//! The separator is a pretrained source-separation model driven through its
//! command line. Its "return value" is a set of stem files written into the
//! output directory; depending on the separator version the stems land
//! either directly in the requested directory or one level deeper, in a
//! subdirectory named after the input file's stem. Both layouts are
//! accepted and normalized here.

use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use crate::command::run_captured;
use crate::error::{MediaError, MediaResult};

/// Configuration for the separator invocation.
#[derive(Debug, Clone)]
pub struct SeparatorConfig {
    /// Separator executable name or path
    pub binary: String,
    /// Model identifier passed via `-p`
    pub model: String,
    /// Output codec passed via `-c` (also the stem file extension)
    pub codec: String,
    /// Disable GPU inference on the child process
    pub disable_gpu: bool,
    /// Timeout in seconds for the whole separation run
    pub timeout_secs: Option<u64>,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            binary: "spleeter".to_string(),
            model: "spleeter:5stems".to_string(),
            codec: "mp3".to_string(),
            disable_gpu: true,
            timeout_secs: Some(1800),
        }
    }
}

/// The five stems produced by a 5-stem separation.
#[derive(Debug, Clone)]
pub struct StemSet {
    vocals: PathBuf,
    bass: PathBuf,
    drums: PathBuf,
    other: PathBuf,
    piano: PathBuf,
}

impl StemSet {
    /// Locate all five stems inside `dir`, verifying each exists and is
    /// non-empty.
    pub fn locate(dir: &Path, codec: &str) -> MediaResult<Self> {
        let stem_path = |name: &str| -> MediaResult<PathBuf> {
            let path = dir.join(format!("{}.{}", name, codec));
            match std::fs::metadata(&path) {
                Ok(meta) if meta.len() > 0 => Ok(path),
                Ok(_) => Err(MediaError::EmptyOutput(path)),
                Err(_) => Err(MediaError::missing_stem(name, path)),
            }
        };

        Ok(Self {
            vocals: stem_path("vocals")?,
            bass: stem_path("bass")?,
            drums: stem_path("drums")?,
            other: stem_path("other")?,
            piano: stem_path("piano")?,
        })
    }

    /// Path to the vocal stem.
    pub fn vocals(&self) -> &Path {
        &self.vocals
    }

    /// The instrumental stems, in mix-input order.
    pub fn accompaniment(&self) -> [&Path; 4] {
        [&self.bass, &self.drums, &self.other, &self.piano]
    }
}

/// Runs the external separator and locates its output stems.
#[derive(Debug, Clone, Default)]
pub struct StemSeparator {
    config: SeparatorConfig,
}

impl StemSeparator {
    pub fn new(config: SeparatorConfig) -> Self {
        Self { config }
    }

    /// Split `audio` into stems under `out_dir`.
    ///
    /// Blocks the calling task for the full model run; downstream stages
    /// must not start until this returns.
    pub async fn separate(&self, audio: &Path, out_dir: &Path) -> MediaResult<StemSet> {
        which::which(&self.config.binary)
            .map_err(|_| MediaError::SeparatorNotFound(self.config.binary.clone()))?;

        tokio::fs::create_dir_all(out_dir).await?;

        info!(
            "Separating stems: {} -> {} (model {})",
            audio.display(),
            out_dir.display(),
            self.config.model
        );

        let mut command = Command::new(&self.config.binary);
        command
            .arg("separate")
            .arg("-p")
            .arg(&self.config.model)
            .arg("-c")
            .arg(&self.config.codec)
            .arg("-o")
            .arg(out_dir)
            .arg(audio);

        if self.config.disable_gpu {
            command.env("CUDA_VISIBLE_DEVICES", "-1");
        }

        let (status, stderr) = run_captured(command, self.config.timeout_secs).await?;

        if !status.success() {
            return Err(MediaError::separation_failed(
                "Separator exited with non-zero status",
                Some(stderr),
                status.code(),
            ));
        }

        let stem_dir = resolve_output_dir(out_dir, audio);
        if !stem_dir.is_dir() {
            return Err(MediaError::SeparationNoOutput(out_dir.to_path_buf()));
        }

        debug!("Stems located in {}", stem_dir.display());
        StemSet::locate(&stem_dir, &self.config.codec)
    }
}

/// Normalize the separator's output directory.
///
/// Some separator versions write stems into `<out_dir>/<audio file stem>/`
/// instead of `<out_dir>/` directly. If that subdirectory exists, it is the
/// true stem directory.
fn resolve_output_dir(requested: &Path, audio: &Path) -> PathBuf {
    if let Some(stem) = audio.file_stem() {
        let nested = requested.join(stem);
        if nested.is_dir() {
            return nested;
        }
    }
    requested.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const STEM_NAMES: [&str; 5] = ["vocals", "bass", "drums", "other", "piano"];

    fn write_stems(dir: &Path) {
        std::fs::create_dir_all(dir).unwrap();
        for name in STEM_NAMES {
            std::fs::write(dir.join(format!("{}.mp3", name)), b"audio").unwrap();
        }
    }

    #[test]
    fn test_locate_flat_layout() {
        let dir = TempDir::new().unwrap();
        write_stems(dir.path());

        let stems = StemSet::locate(dir.path(), "mp3").unwrap();
        assert_eq!(stems.vocals(), dir.path().join("vocals.mp3"));
        assert_eq!(stems.accompaniment().len(), 4);
    }

    #[test]
    fn test_locate_missing_stem() {
        let dir = TempDir::new().unwrap();
        write_stems(dir.path());
        std::fs::remove_file(dir.path().join("drums.mp3")).unwrap();

        let err = StemSet::locate(dir.path(), "mp3").unwrap_err();
        assert!(matches!(err, MediaError::MissingStem { ref name, .. } if name == "drums"));
    }

    #[test]
    fn test_locate_empty_stem_rejected() {
        let dir = TempDir::new().unwrap();
        write_stems(dir.path());
        std::fs::write(dir.path().join("vocals.mp3"), b"").unwrap();

        assert!(matches!(
            StemSet::locate(dir.path(), "mp3").unwrap_err(),
            MediaError::EmptyOutput(_)
        ));
    }

    #[test]
    fn test_resolve_output_dir_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("clip_original_audio");
        write_stems(&nested);

        let resolved =
            resolve_output_dir(dir.path(), Path::new("work/clip_original_audio.mp3"));
        assert_eq!(resolved, nested);

        // And the stems are found where the separator actually put them.
        let stems = StemSet::locate(&resolved, "mp3").unwrap();
        assert_eq!(stems.vocals(), nested.join("vocals.mp3"));
    }

    #[test]
    fn test_resolve_output_dir_flat() {
        let dir = TempDir::new().unwrap();
        write_stems(dir.path());

        let resolved = resolve_output_dir(dir.path(), Path::new("work/song.mp3"));
        assert_eq!(resolved, dir.path());
    }
}
