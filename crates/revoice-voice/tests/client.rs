//! Voice client integration tests against a mock API server.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use revoice_voice::{SpeechToSpeechClient, VoiceError};

fn client_for(server: &MockServer) -> SpeechToSpeechClient {
    SpeechToSpeechClient::new("test-key", None)
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn test_convert_streams_response_to_file() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/speech-to-speech/EXAVITQu4vr4xnSDxMaL/stream"))
        .and(header("xi-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"converted-audio".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let vocals = dir.path().join("vocals.mp3");
    std::fs::write(&vocals, b"raw-vocal-stem").unwrap();
    let output = dir.path().join("modified_vocals.mp3");

    let client = client_for(&server);
    client
        .convert(&vocals, "EXAVITQu4vr4xnSDxMaL", &output)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), b"converted-audio");
}

#[tokio::test]
async fn test_convert_rejected_status_is_hard_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/speech-to-speech/badvoice/stream"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service busy"))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let vocals = dir.path().join("vocals.mp3");
    std::fs::write(&vocals, b"raw-vocal-stem").unwrap();
    let output = dir.path().join("modified_vocals.mp3");

    let client = client_for(&server);
    let err = client.convert(&vocals, "badvoice", &output).await.unwrap_err();

    match err {
        VoiceError::Api { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "service busy");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(!output.exists(), "no output file may be written on rejection");
}

#[tokio::test]
async fn test_convert_missing_vocals_file() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();

    let client = client_for(&server);
    let err = client
        .convert(
            dir.path().join("nope.mp3"),
            "EXAVITQu4vr4xnSDxMaL",
            dir.path().join("out.mp3"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, VoiceError::Io(_)));
}
