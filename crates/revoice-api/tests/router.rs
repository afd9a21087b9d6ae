//! Router integration tests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use revoice_api::{create_router, AppConfig, AppState};

const BOUNDARY: &str = "------------------------revoicetest";

fn test_router(work_dir: &std::path::Path) -> axum::Router {
    let config = AppConfig {
        voice_api_key: "test-key".to_string(),
        work_dir: work_dir.to_path_buf(),
        ..AppConfig::default()
    };
    let state = AppState::new(config).expect("test state");
    create_router(state)
}

fn multipart_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\r\n",
                    name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn test_form_lists_voice_catalog() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_router(dir.path());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Rachel Voice, Female, Corporate"));
    assert!(body.contains("EXAVITQu4vr4xnSDxMaL"));
    assert!(body.contains("name=\"voice_id\""));
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_router(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_post_without_video_field_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_router(dir.path());

    let request = multipart_request(&[("voice_id", None, b"EXAVITQu4vr4xnSDxMaL")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("No video file was uploaded."));
}

#[tokio::test]
async fn test_post_with_empty_video_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_router(dir.path());

    let request = multipart_request(&[
        ("video", Some("clip.mp4"), b""),
        ("voice_id", None, b"EXAVITQu4vr4xnSDxMaL"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("No video file was uploaded."));
}

#[tokio::test]
async fn test_post_without_voice_field_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_router(dir.path());

    let request = multipart_request(&[("video", Some("clip.mp4"), b"not-a-real-video")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("No voice was selected."));
}

#[tokio::test]
async fn test_unprocessable_video_yields_generic_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_router(dir.path());

    // Bytes that no transcoder will accept; the pipeline fails at the
    // extraction stage no matter which tools are installed.
    let request = multipart_request(&[
        ("video", Some("clip.mp4"), b"not-a-real-video"),
        ("voice_id", None, b"EXAVITQu4vr4xnSDxMaL"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.contains("An error occurred"));
}
