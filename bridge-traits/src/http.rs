//! HTTP Client Abstraction
//!
//! Request/response records and the async [`HttpClient`] contract every
//! upstream catalog client talks through. Non-2xx statuses are answers, not
//! errors: providers read [`HttpResponse::status`] and decide what a failure
//! means for them. Only transport problems surface as [`BridgeError`].

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// Methods the upstream catalogs are called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    /// Overrides the client-wide timeout for this request
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Serializes `body` as the JSON payload.
    pub fn json<T: Serialize>(self, body: &T) -> Result<Self> {
        let payload = serde_json::to_vec(body).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON serialization failed: {}", e))
        })?;

        Ok(self
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(Bytes::from(payload)))
    }

    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// The URL without its query string, safe to log.
    pub fn loggable_url(&self) -> &str {
        loggable_url(&self.url)
    }
}

/// Cuts the query string off `url`.
///
/// Catalog credentials travel as query parameters, so only this form of a
/// request URL may appear in logs and error messages.
pub fn loggable_url(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Build a response with no headers
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON deserialization failed: {}", e))
        })
    }

    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| BridgeError::OperationFailed(format!("Invalid UTF-8: {}", e)))
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 5xx and 429 are worth asking again; everything else is final.
    pub fn is_transient_failure(&self) -> bool {
        self.status >= 500 || self.status == 429
    }
}

/// How often and how patiently a request is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    /// Wait before the first retry; doubles for each further retry
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy that performs exactly one attempt
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Async HTTP transport shared by every upstream client.
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest};
///
/// let response = client
///     .execute(HttpRequest::get("https://itunes.apple.com/search?term=yoasobi"))
///     .await?;
/// assert!(response.is_success());
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a request with the client's default retry policy.
    ///
    /// Fails only when no response was received: refused connection, TLS
    /// failure or timeout.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Sends a request with an explicit retry policy. Clients without retry
    /// support send it once.
    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        let _ = policy;
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_request() {
        let request = HttpRequest::post("http://localhost:65000/translate")
            .json(&serde_json::json!({ "q": "hello" }))
            .unwrap()
            .timeout(Duration::from_secs(10));

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(request.body.unwrap(), Bytes::from(r#"{"q":"hello"}"#));
        assert_eq!(request.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_loggable_url_drops_query() {
        let request =
            HttpRequest::get("https://www.googleapis.com/youtube/v3/videos?id=v1&key=secret");

        assert_eq!(
            request.loggable_url(),
            "https://www.googleapis.com/youtube/v3/videos"
        );
        assert_eq!(
            loggable_url("https://api.lyrics.ovh/v1/A/B"),
            "https://api.lyrics.ovh/v1/A/B"
        );
        assert_eq!(loggable_url("https://x.test/page#frag"), "https://x.test/page");
    }

    #[test]
    fn test_response_classification() {
        assert!(HttpResponse::new(204, "").is_success());

        let not_found = HttpResponse::new(404, "");
        assert!(!not_found.is_success());
        assert!(!not_found.is_transient_failure());

        assert!(HttpResponse::new(503, "").is_transient_failure());
        assert!(HttpResponse::new(429, "").is_transient_failure());
    }

    #[test]
    fn test_response_body_decoding() {
        let response = HttpResponse::new(200, r#"{"lyrics":"la"}"#);
        let parsed: serde_json::Value = response.json().unwrap();
        assert_eq!(parsed["lyrics"], "la");

        let html = HttpResponse::new(200, "<html>");
        let parsed: Result<serde_json::Value> = html.json();
        assert!(matches!(parsed, Err(BridgeError::OperationFailed(_))));
        assert_eq!(html.text().unwrap(), "<html>");
    }

    #[test]
    fn test_retry_delays_double_up_to_cap() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3), Duration::from_millis(800));
        assert_eq!(policy.delay_for(40), Duration::from_secs(2));
        assert_eq!(RetryPolicy::no_retry().max_attempts, 1);
    }
}
