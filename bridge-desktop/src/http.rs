//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy},
};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("music-discovery-core/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Reqwest-backed [`HttpClient`].
///
/// Transient answers (5xx, 429) and transport failures are retried with
/// doubling delays. When every attempt ends in a transient status the last
/// response is returned so the caller can report the upstream message.
pub struct ReqwestHttpClient {
    client: Client,
    default_policy: RetryPolicy,
}

impl ReqwestHttpClient {
    /// Client with a 6 second request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(6))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BridgeError::NotAvailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client))
    }

    /// Wrap a preconfigured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            default_policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy used by [`HttpClient::execute`]
    pub fn with_default_policy(mut self, policy: RetryPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }

    async fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.request(Self::method(request.method), &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(request, e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(request, e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Reqwest errors embed the full URL; only the query-free form is kept.
fn transport_error(request: &HttpRequest, error: reqwest::Error) -> BridgeError {
    let url = request.loggable_url();
    let reason = error.without_url();

    if reason.is_timeout() {
        BridgeError::Timeout(url.to_string())
    } else if reason.is_connect() {
        BridgeError::OperationFailed(format!("Connection to {} failed: {}", url, reason))
    } else {
        BridgeError::OperationFailed(format!("Request to {} failed: {}", url, reason))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_with_retry(request, self.default_policy.clone())
            .await
    }

    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        let max_attempts = policy.max_attempts.max(1);
        let url = request.loggable_url();
        let mut outcome = Err(BridgeError::OperationFailed(format!(
            "No attempt made for {}",
            url
        )));

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = policy.delay_for(attempt - 1);
                debug!(url, attempt, delay_ms = delay.as_millis() as u64, "Retrying request");
                sleep(delay).await;
            }

            outcome = self.send_once(&request).await;
            match &outcome {
                Ok(response) if !response.is_transient_failure() => break,
                Ok(response) => {
                    warn!(url, status = response.status, attempt, "Transient upstream status")
                }
                Err(e) => warn!(url, error = %e, attempt, "HTTP request failed"),
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_policies() {
        let client = ReqwestHttpClient::new().unwrap();
        assert_eq!(client.default_policy.max_attempts, 3);

        let client = client.with_default_policy(RetryPolicy::no_retry());
        assert_eq!(client.default_policy.max_attempts, 1);
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(ReqwestHttpClient::method(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(ReqwestHttpClient::method(HttpMethod::Post), reqwest::Method::POST);
    }

    #[tokio::test]
    async fn test_unreachable_host_error_hides_query() {
        let client = ReqwestHttpClient::with_timeout(Duration::from_millis(500))
            .unwrap()
            .with_default_policy(RetryPolicy::no_retry());

        let err = client
            .execute(HttpRequest::get("http://127.0.0.1:9/youtube/v3/search?key=secret"))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("127.0.0.1:9/youtube/v3/search"));
        assert!(!message.contains("secret"));
    }
}
