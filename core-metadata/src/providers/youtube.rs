//! YouTube Data API v3 Client
//!
//! Video search plus video and channel details.
//!
//! ## API Endpoints
//!
//! - **Search**: `GET /search?part=snippet&type=video&q={query}`
//! - **Videos**: `GET /videos?part=snippet,contentDetails,statistics&id={id}`
//! - **Channels**: `GET /channels?part=snippet,statistics&id={id}`
//!
//! Every request carries the API key as the `key` query parameter, so request
//! URLs are never logged; only the endpoint path is.
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::providers::YouTubeClient;
//!
//! let client = YouTubeClient::new(http_client, api_key);
//! let videos = client.search_videos("yoasobi", 12, Some("ja")).await?;
//! ```

use super::{build_url, parse_body, upstream_error};
use crate::error::Result;
use bridge_traits::http::{HttpClient, HttpRequest};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// YouTube Data API base URL
pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(6);

const FALLBACK_ERROR: &str = "YouTube API request failed";

// =============================================================================
// Public records
// =============================================================================

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: String,
    pub title: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<String>,
    /// Medium thumbnail, default thumbnail when there is no medium one
    pub thumbnail: Option<String>,
}

/// Full record for one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    /// ISO 8601 duration as reported, e.g. `PT4M13S`
    pub duration: Option<String>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
}

impl VideoDetails {
    /// Duration rendered as `m:ss` or `h:mm:ss`.
    pub fn formatted_duration(&self) -> Option<String> {
        self.duration
            .as_deref()
            .and_then(parse_iso8601_duration)
            .map(format_duration)
    }
}

/// Full record for one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDetails {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub subscribers: Option<u64>,
    pub view_count: Option<u64>,
    pub thumbnail: Option<String>,
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: Option<String>,
    description: Option<String>,
    channel_id: Option<String>,
    channel_title: Option<String>,
    published_at: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    #[serde(rename = "default")]
    fallback: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

impl Thumbnails {
    fn medium_url(&self) -> Option<String> {
        self.medium.as_ref().and_then(|t| t.url.clone())
    }

    fn default_url(&self) -> Option<String> {
        self.fallback.as_ref().and_then(|t| t.url.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<SearchId>,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    duration: Option<String>,
}

/// Counters arrive as decimal strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    subscriber_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    content_details: Option<ContentDetails>,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

fn count(value: Option<String>) -> Option<u64> {
    value.and_then(|v| v.trim().parse().ok())
}

impl SearchItem {
    fn into_summary(self) -> Option<VideoSummary> {
        let id = self.id.and_then(|id| id.video_id)?;
        let snippet = self.snippet;
        let thumbnail = snippet
            .thumbnails
            .as_ref()
            .and_then(|t| t.medium_url().or_else(|| t.default_url()));

        Some(VideoSummary {
            id,
            title: snippet.title,
            channel_id: snippet.channel_id,
            channel_title: snippet.channel_title,
            published_at: snippet.published_at,
            thumbnail,
        })
    }
}

impl From<VideoItem> for VideoDetails {
    fn from(item: VideoItem) -> Self {
        Self {
            id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            published_at: item.snippet.published_at,
            channel_id: item.snippet.channel_id,
            channel_title: item.snippet.channel_title,
            duration: item.content_details.and_then(|c| c.duration),
            view_count: count(item.statistics.view_count),
            like_count: count(item.statistics.like_count),
        }
    }
}

impl From<ChannelItem> for ChannelDetails {
    fn from(item: ChannelItem) -> Self {
        let thumbnail = item
            .snippet
            .thumbnails
            .as_ref()
            .and_then(Thumbnails::default_url);

        Self {
            id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            subscribers: count(item.statistics.subscriber_count),
            view_count: count(item.statistics.view_count),
            thumbnail,
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// YouTube Data API client
pub struct YouTubeClient {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl YouTubeClient {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: YOUTUBE_API_BASE.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let mut params = params.to_vec();
        params.push(("key", self.api_key.as_str()));

        let url = build_url(&format!("{}{}", self.base_url, path), &params);
        debug!(endpoint = path, "Calling YouTube Data API");

        let response = self
            .http_client
            .execute(HttpRequest::get(url).timeout(self.timeout))
            .await?;

        if !response.is_success() {
            return Err(upstream_error(&response, FALLBACK_ERROR));
        }

        parse_body(&response)
    }

    /// Searches embeddable, syndicated videos.
    ///
    /// A blank query returns an empty list without calling the API. Hits
    /// without a video id are dropped.
    pub async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
        language: Option<&str>,
    ) -> Result<Vec<VideoSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let max_results = max_results.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("q", query),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("videoEmbeddable", "true"),
            ("videoSyndicated", "true"),
        ];
        if let Some(language) = language.map(str::trim).filter(|l| !l.is_empty()) {
            params.push(("relevanceLanguage", language));
        }

        let response: ListResponse<SearchItem> = self.get("/search", &params).await?;
        let videos: Vec<VideoSummary> = response
            .items
            .into_iter()
            .filter_map(SearchItem::into_summary)
            .collect();

        debug!(count = videos.len(), "Video search completed");
        Ok(videos)
    }

    /// Fetches one video. `Ok(None)` when the id is unknown.
    pub async fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>> {
        let response: ListResponse<VideoItem> = self
            .get(
                "/videos",
                &[("part", "snippet,contentDetails,statistics"), ("id", video_id.trim())],
            )
            .await?;

        Ok(response.items.into_iter().next().map(VideoDetails::from))
    }

    /// Fetches one channel. `Ok(None)` when the id is unknown.
    pub async fn channel_details(&self, channel_id: &str) -> Result<Option<ChannelDetails>> {
        let response: ListResponse<ChannelItem> = self
            .get(
                "/channels",
                &[("part", "snippet,statistics"), ("id", channel_id.trim())],
            )
            .await?;

        Ok(response.items.into_iter().next().map(ChannelDetails::from))
    }
}

// =============================================================================
// Durations
// =============================================================================

static ISO8601_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("ISO 8601 duration regex")
});

/// Parses the `PnDTnHnMnS` durations the API reports.
///
/// ```
/// use core_metadata::providers::youtube::parse_iso8601_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(Duration::from_secs(3723)));
/// assert_eq!(parse_iso8601_duration("banana"), None);
/// ```
pub fn parse_iso8601_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value == "P" || value.ends_with('T') {
        return None;
    }

    let caps = ISO8601_DURATION.captures(value)?;
    let part = |index: usize| -> Option<u64> {
        caps.get(index)
            .map_or(Some(0), |m| m.as_str().parse::<u64>().ok())
    };

    let seconds = part(1)?
        .checked_mul(86_400)?
        .checked_add(part(2)?.checked_mul(3_600)?)?
        .checked_add(part(3)?.checked_mul(60)?)?
        .checked_add(part(4)?)?;

    Some(Duration::from_secs(seconds))
}

/// Renders a duration as `m:ss`, or `h:mm:ss` from one hour up.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
