//! Tests for the HTTP backend's failure handling.

use serde_json::json;
use taleweave::api::{GenerateImageRequest, GenerateStoryRequest};
use taleweave::client::{HttpBackend, StoryBackend};
use taleweave::error::{ErrorKind, Subsystem};
use taleweave::story::StoryConfiguration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn start_request() -> GenerateStoryRequest {
    GenerateStoryRequest::start(StoryConfiguration::default())
}

#[tokio::test]
async fn error_body_is_taken_as_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-story"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": "Too many requests. Please wait a moment and try again.",
            "code": "RATE_LIMITED",
            "retryable": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = HttpBackend::new(server.uri())
        .generate_story(&start_request())
        .await
        .unwrap_err();

    assert_eq!(record.kind(), ErrorKind::RateLimited);
    assert_eq!(record.http_status(), 429);
    assert!(record.is_retryable());
    assert_eq!(
        record.user_message(),
        "Too many requests. Please wait a moment and try again."
    );
    assert_eq!(record.subsystem(), Subsystem::Narrative);
}

#[tokio::test]
async fn unknown_code_falls_back_to_unknown_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Something odd",
            "code": "SOMETHING_NEW",
            "retryable": false
        })))
        .mount(&server)
        .await;

    let record = HttpBackend::new(server.uri())
        .generate_story(&start_request())
        .await
        .unwrap_err();

    assert_eq!(record.kind(), ErrorKind::UnknownError);
    assert!(!record.is_retryable());
}

#[tokio::test]
async fn unreadable_error_body_is_retryable_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-image"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let request = GenerateImageRequest {
        image_prompt: "a ruined abbey".into(),
        story_settings: None,
    };
    let record = HttpBackend::new(server.uri())
        .generate_image(&request)
        .await
        .unwrap_err();

    assert_eq!(record.kind(), ErrorKind::UnknownError);
    assert!(record.is_retryable());
    assert_eq!(record.http_status(), 502);
    assert_eq!(record.user_message(), "Error generating image");
    assert_eq!(record.subsystem(), Subsystem::Illustration);
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let record = HttpBackend::new("http://127.0.0.1:1")
        .generate_story(&start_request())
        .await
        .unwrap_err();

    assert_eq!(record.kind(), ErrorKind::NetworkError);
    assert!(record.is_retryable());
}

#[tokio::test]
async fn success_body_is_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-story"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "narrative": "Rain falls.",
            "imagePrompt": "rain on cobblestones"
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(format!("{}/", server.uri()));
    assert_eq!(backend.base_url(), server.uri());
    let response = backend.generate_story(&start_request()).await.unwrap();
    assert_eq!(response.narrative, "Rain falls.");
    assert_eq!(response.image_prompt, "rain on cobblestones");
}

#[tokio::test]
async fn truncated_success_body_is_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-story"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(r#"{"narrative": "trunc"#),
        )
        .mount(&server)
        .await;

    let record = HttpBackend::new(server.uri())
        .generate_story(&start_request())
        .await
        .unwrap_err();

    assert_eq!(record.kind(), ErrorKind::NetworkError);
    assert_eq!(record.http_status(), 503);
    assert!(record.is_retryable());
    assert_eq!(record.subsystem(), Subsystem::Narrative);
}
