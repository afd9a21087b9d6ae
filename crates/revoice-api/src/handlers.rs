//! Request handlers.

use axum::body::{Body, Bytes};
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, Response};
use axum::Json;
use tracing::{info, warn};

use revoice_models::{voice_catalog, JobId};
use revoice_pipeline::JobWorkspace;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Render the upload form.
///
/// GET /
pub async fn upload_form() -> Html<String> {
    let mut options = String::new();
    for voice in voice_catalog() {
        options.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            voice.voice_id, voice.label
        ));
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Revoice</title></head>
<body>
  <h1>Swap the voice in a video</h1>
  <form method="post" action="/" enctype="multipart/form-data">
    <p><label>Video file: <input type="file" name="video" accept="video/*" required></label></p>
    <p><label>Voice: <select name="voice_id">{options}</select></label></p>
    <p><button type="submit">Convert</button></p>
  </form>
</body>
</html>"#
    ))
}

/// Accept an uploaded video, run it through the pipeline, and return the
/// converted video as an attachment.
///
/// POST / (multipart: `video` file field, `voice_id` text field)
pub async fn convert_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let mut video: Option<(String, Bytes)> = None;
    let mut voice_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("video") => {
                let filename = field.file_name().unwrap_or("upload.mp4").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
                video = Some((filename, data));
            }
            Some("voice_id") => {
                voice_id = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read voice selection: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let (filename, data) = match video {
        Some((filename, data)) if !data.is_empty() => (filename, data),
        _ => return Err(ApiError::bad_request("No video file was uploaded.")),
    };
    let voice_id = voice_id.ok_or_else(|| ApiError::bad_request("No voice was selected."))?;

    let job_id = JobId::new();
    info!(
        job_id = %job_id,
        filename = %filename,
        voice_id = %voice_id,
        size = data.len(),
        "Upload received"
    );

    let workspace = JobWorkspace::create(&state.config.work_dir, &job_id, &filename).await?;

    let result = process_upload(&state, &job_id, &workspace, &voice_id, &data).await;

    // Artifacts are deleted after the delay whether the job succeeded or
    // not; the served bytes are already in memory by this point.
    state
        .cleanup
        .schedule(job_id.clone(), workspace.cleanup_plan());

    let output = result.map_err(|e| {
        warn!(job_id = %job_id, "Conversion failed: {}", e);
        e
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", workspace.download_name()),
        )
        .header(header::CONTENT_LENGTH, output.len())
        .body(Body::from(output))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}

/// Store the upload, run the pipeline, and load the final video.
async fn process_upload(
    state: &AppState,
    job_id: &JobId,
    workspace: &JobWorkspace,
    voice_id: &str,
    data: &[u8],
) -> ApiResult<Vec<u8>> {
    tokio::fs::write(workspace.upload_path(), data)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store upload: {}", e)))?;

    let output = state.pipeline.run(job_id, workspace, voice_id).await?;

    tokio::fs::read(&output)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load output video: {}", e)))
}

/// Liveness probe.
///
/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
