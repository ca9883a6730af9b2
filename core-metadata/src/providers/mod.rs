//! External Catalog Providers
//!
//! This module contains clients for the upstream catalogs:
//! - YouTube Data API v3 - video search, video and channel details
//! - iTunes Search API - secondary music catalog
//!
//! Both share one [`HttpClient`](bridge_traits::http::HttpClient) and turn
//! non-2xx answers into [`MetadataError::Upstream`] carrying the message the
//! upstream reported.

pub mod itunes;
pub mod youtube;

pub use itunes::ItunesClient;
pub use youtube::{ChannelDetails, VideoDetails, VideoSummary, YouTubeClient};

use crate::error::MetadataError;
use bridge_traits::http::HttpResponse;
use serde::de::DeserializeOwned;

/// Appends percent-encoded query parameters to `base`.
pub(crate) fn build_url(base: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, query)
    }
}

/// Maps a failed response to an upstream error.
///
/// Understands both `{"error": {"message": ".."}}` and `{"error": ".."}`
/// bodies; anything else gets `fallback`.
pub(crate) fn upstream_error(response: &HttpResponse, fallback: &str) -> MetadataError {
    let body = response.json::<serde_json::Value>().ok();
    let message = body
        .as_ref()
        .and_then(|body| body.get("error"))
        .and_then(|error| {
            error
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| error.as_str())
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(fallback);

    MetadataError::upstream(message, Some(response.status))
}

/// Parses a successful response body.
pub(crate) fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, MetadataError> {
    serde_json::from_slice(&response.body).map_err(|e| MetadataError::JsonParse(e.to_string()))
}
