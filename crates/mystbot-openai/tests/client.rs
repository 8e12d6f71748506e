//! Integration tests for the OpenAI client using wiremock HTTP mocks.

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mystbot_openai::{OpenAiClient, OpenAiError};

fn test_client(base_url: &str) -> OpenAiClient {
    OpenAiClient::with_base_url("sk-test", 10, base_url)
        .expect("client construction should not fail")
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [ { "message": { "role": "assistant", "content": content } } ]
    })
}

#[tokio::test]
async fn generate_script_returns_script_and_keywords() {
    let server = MockServer::start().await;

    let story = r#"{"script": "The tape was blank, except for the last four seconds.", "keywords": ["cassette", "static", "basement", "flashlight", "fog"]}"#;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o",
            "response_format": { "type": "json_object" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(story)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let (script, keywords) = client
        .generate_script("The blank tape", "Found a cassette in the wall...")
        .await
        .expect("generation should succeed");

    assert!(script.starts_with("The tape was blank"));
    assert_eq!(keywords.len(), 5);
}

#[tokio::test]
async fn generate_script_surfaces_api_status_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.generate_script("t", "b").await;
    assert!(matches!(
        result,
        Err(OpenAiError::UnexpectedStatus { status: 429, .. })
    ));
}

#[tokio::test]
async fn generate_script_rejects_empty_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("   ")))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.generate_script("t", "b").await;
    assert!(matches!(result, Err(OpenAiError::EmptyCompletion)));
}

#[tokio::test]
async fn generate_script_rejects_keyword_shortfall() {
    let server = MockServer::start().await;

    let story = r#"{"script": "A story.", "keywords": ["only", "two"]}"#;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(story)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.generate_script("t", "b").await;
    assert!(matches!(
        result,
        Err(OpenAiError::TooFewKeywords { count: 2 })
    ));
}

#[tokio::test]
async fn synthesize_speech_writes_mp3_to_output_dir() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_partial_json(serde_json::json!({
            "model": "tts-1",
            "voice": "onyx",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3fake-mp3-bytes".to_vec()))
        .mount(&server)
        .await;

    let output_dir = std::env::temp_dir().join(format!("mystbot-tts-{}", std::process::id()));
    let client = test_client(&server.uri());
    let mp3_path = client
        .synthesize_speech(&output_dir, 42, "The tape was blank.", "onyx")
        .await
        .expect("synthesis should succeed");

    assert_eq!(
        mp3_path.file_name().and_then(|n| n.to_str()),
        Some("story_42.mp3")
    );
    let written = std::fs::read(&mp3_path).expect("file should exist");
    assert_eq!(written, b"ID3fake-mp3-bytes");

    std::fs::remove_dir_all(&output_dir).ok();
}

#[tokio::test]
async fn synthesize_speech_surfaces_api_status_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let output_dir = std::env::temp_dir();
    let client = test_client(&server.uri());
    let result = client
        .synthesize_speech(&output_dir, 1, "text", "onyx")
        .await;
    assert!(matches!(
        result,
        Err(OpenAiError::UnexpectedStatus { status: 500, .. })
    ));
}
