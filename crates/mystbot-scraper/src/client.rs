//! HTTP client for the Bright Data Web Unlocker gateway.
//!
//! The gateway performs the actual upstream retrieval: we POST the target URL
//! plus zone credentials to the gateway endpoint and receive the raw upstream
//! body back. Failures are retried with exponential backoff and never surface
//! to the caller: a feed that cannot be fetched simply yields no candidates.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::ScrapeError;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const PARSE_SNIPPET_LEN: usize = 200;

/// Client for the Bright Data `/request` gateway endpoint.
///
/// `max_attempts` is the total number of tries per fetch. The wait before
/// retry `n` is `backoff_base_secs * 2^(n-1)` seconds (2s, 4s with the
/// default base of 2); tests pass a base of `0` to skip the sleeps.
pub struct GatewayClient {
    client: Client,
    endpoint: String,
    api_key: String,
    zone: String,
    max_attempts: u32,
    backoff_base_secs: u64,
}

/// Why a single fetch attempt failed. Only ever logged, never returned.
enum FetchFailure {
    Status(StatusCode),
    Transport(reqwest::Error),
    EmptyBody,
    Parse {
        source: serde_json::Error,
        snippet: String,
    },
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::Status(status) => write!(f, "gateway returned HTTP {status}"),
            FetchFailure::Transport(e) => write!(f, "transport error: {e}"),
            FetchFailure::EmptyBody => write!(f, "gateway returned an empty body"),
            FetchFailure::Parse { source, snippet } => {
                write!(f, "body is not valid JSON ({source}); body starts: {snippet}")
            }
        }
    }
}

impl GatewayClient {
    /// Creates a gateway client with configured timeout and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        endpoint: &str,
        api_key: &str,
        zone: &str,
        timeout_secs: u64,
        max_attempts: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
            api_key: api_key.to_owned(),
            zone: zone.to_owned(),
            max_attempts: max_attempts.max(1),
            backoff_base_secs,
        })
    }

    /// Fetch `target_url` through the gateway and parse the body as JSON.
    ///
    /// Retries on non-2xx status, transport failure, empty body, or a body
    /// that fails to parse. Returns `None` once all attempts are exhausted;
    /// every failure is logged, none is propagated, so one dead feed cannot
    /// abort the run.
    pub async fn fetch(&self, target_url: &str) -> Option<Value> {
        for attempt in 1..=self.max_attempts {
            tracing::info!(
                attempt,
                max_attempts = self.max_attempts,
                url = target_url,
                "gateway request"
            );

            match self.try_fetch(target_url).await {
                Ok(value) => return Some(value),
                Err(failure) => {
                    tracing::warn!(
                        attempt,
                        url = target_url,
                        reason = %failure,
                        "gateway fetch attempt failed"
                    );
                }
            }

            if attempt < self.max_attempts {
                let wait_secs = backoff_wait_secs(self.backoff_base_secs, attempt);
                tracing::info!(wait_secs, "retrying gateway fetch");
                tokio::time::sleep(Duration::from_secs(wait_secs)).await;
            }
        }

        tracing::error!(
            attempts = self.max_attempts,
            url = target_url,
            "all gateway fetch attempts failed"
        );
        None
    }

    async fn try_fetch(&self, target_url: &str) -> Result<Value, FetchFailure> {
        let payload = serde_json::json!({
            "zone": self.zone,
            "url": target_url,
            "format": "raw",
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(FetchFailure::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status));
        }

        let body = response.text().await.map_err(FetchFailure::Transport)?;
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(FetchFailure::EmptyBody);
        }

        serde_json::from_str(trimmed).map_err(|source| FetchFailure::Parse {
            source,
            snippet: trimmed.chars().take(PARSE_SNIPPET_LEN).collect(),
        })
    }
}

/// Seconds to wait after failed attempt `attempt` (1-based):
/// `base * 2^(attempt-1)`, with the shift capped to keep the doubling sane.
fn backoff_wait_secs(base_secs: u64, attempt: u32) -> u64 {
    base_secs.saturating_mul(1u64 << (attempt - 1).min(10))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;
