//! Delayed best-effort artifact cleanup.
//!
//! Cleanup runs once per job, on a detached task, a fixed delay after the
//! response has been prepared. It must never fail the job: a missing
//! target is normal (the client may have raced us), and any other removal
//! error is logged and swallowed.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use revoice_models::JobId;

/// File and directory paths a finished job leaves behind.
#[derive(Debug, Clone, Default)]
pub struct CleanupPlan {
    /// Individual files, removed first
    pub files: Vec<PathBuf>,
    /// Directories, removed recursively after the files
    pub dirs: Vec<PathBuf>,
}

/// Schedules fire-and-forget deletion of job artifacts.
#[derive(Debug, Clone)]
pub struct CleanupScheduler {
    delay: Duration,
    shutdown: CancellationToken,
}

impl CleanupScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            shutdown: CancellationToken::new(),
        }
    }

    /// Schedule removal of everything in `plan` after the configured delay.
    ///
    /// The returned handle is only needed by tests; callers normally drop
    /// it and let the task run detached.
    pub fn schedule(&self, job_id: JobId, plan: CleanupPlan) -> JoinHandle<()> {
        let delay = self.delay;
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!(job_id = %job_id, "Cleanup abandoned at shutdown");
                }
                _ = tokio::time::sleep(delay) => {
                    remove_all(&job_id, &plan).await;
                }
            }
        })
    }

    /// Abandon all pending cleanups (process shutdown).
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

async fn remove_all(job_id: &JobId, plan: &CleanupPlan) {
    for file in &plan.files {
        match tokio::fs::remove_file(file).await {
            Ok(()) => debug!(job_id = %job_id, "Removed {}", file.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(job_id = %job_id, "Failed to remove {}: {}", file.display(), e),
        }
    }

    for dir in &plan.dirs {
        match tokio::fs::remove_dir_all(dir).await {
            Ok(()) => debug!(job_id = %job_id, "Removed {}", dir.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(job_id = %job_id, "Failed to remove {}: {}", dir.display(), e),
        }
    }
}
