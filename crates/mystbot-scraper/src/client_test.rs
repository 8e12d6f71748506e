//! Gateway client retry behavior against a wiremock server.

use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use super::{backoff_wait_secs, GatewayClient};

/// A client with zero backoff so retry tests finish instantly.
fn test_client(endpoint: &str) -> GatewayClient {
    GatewayClient::new(endpoint, "test-key", "test-zone", 5, 3, 0)
        .expect("client construction should not fail")
}

/// Responds with `failures` error responses, then a valid listing body.
struct FailThenSucceed {
    failures: usize,
    counter: std::sync::atomic::AtomicUsize,
}

impl Respond for FailThenSucceed {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if n < self.failures {
            ResponseTemplate::new(502)
        } else {
            ResponseTemplate::new(200).set_body_string(r#"{"data":{"children":[]}}"#)
        }
    }
}

#[test]
fn default_backoff_waits_two_then_four_seconds() {
    assert_eq!(backoff_wait_secs(2, 1), 2);
    assert_eq!(backoff_wait_secs(2, 2), 4);
}

#[test]
fn zero_base_skips_all_backoff_waits() {
    assert_eq!(backoff_wait_secs(0, 1), 0);
    assert_eq!(backoff_wait_secs(0, 2), 0);
}

#[test]
fn backoff_shift_is_capped_for_large_attempt_counts() {
    assert_eq!(backoff_wait_secs(2, 11), 2048);
    assert_eq!(backoff_wait_secs(2, 40), 2048);
}

#[tokio::test]
async fn sends_zone_and_bearer_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "zone": "test-zone",
            "url": "https://www.reddit.com/r/RBI/hot.json",
            "format": "raw",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{"children":[]}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch("https://www.reddit.com/r/RBI/hot.json").await;
    assert!(result.is_some());
}

#[tokio::test]
async fn succeeds_on_third_attempt_after_two_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(FailThenSucceed {
            failures: 2,
            counter: std::sync::atomic::AtomicUsize::new(0),
        })
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch("https://www.reddit.com/r/RBI/hot.json").await;
    assert!(result.is_some(), "third attempt should succeed");
}

#[tokio::test]
async fn returns_none_after_exhausting_attempts_on_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch("https://www.reddit.com/r/RBI/hot.json").await;
    assert!(result.is_none());
}

#[tokio::test]
async fn empty_body_is_retried_then_yields_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("   \n  "))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch("https://www.reddit.com/r/RBI/hot.json").await;
    assert!(result.is_none(), "whitespace-only body counts as a failure");
}

#[tokio::test]
async fn malformed_json_is_retried_then_yields_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch("https://www.reddit.com/r/RBI/hot.json").await;
    assert!(result.is_none());
}

#[tokio::test]
async fn succeeds_immediately_without_retrying() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"data":{"children":[{"data":{"id":"x1"}}]}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let value = client
        .fetch("https://www.reddit.com/r/RBI/hot.json")
        .await
        .expect("fetch should succeed");
    assert_eq!(value["data"]["children"][0]["data"]["id"], "x1");
}
