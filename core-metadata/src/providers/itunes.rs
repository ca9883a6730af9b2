//! iTunes Search API client
//!
//! Secondary music catalog used to confirm the artist and title guessed from
//! a video title. Results come back as [`CatalogItem`]s ready for
//! [`select_best`](crate::matching::select_best).

use super::{build_url, parse_body, upstream_error};
use crate::catalog::CatalogItem;
use crate::error::Result;
use bridge_traits::http::{HttpClient, HttpRequest};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// iTunes Search API endpoint
pub const ITUNES_SEARCH_URL: &str = "https://itunes.apple.com/search";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ItunesTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItunesTrack {
    track_name: Option<String>,
    artist_name: Option<String>,
    collection_name: Option<String>,
    release_date: Option<String>,
    primary_genre_name: Option<String>,
    artwork_url100: Option<String>,
    preview_url: Option<String>,
    track_view_url: Option<String>,
    artist_view_url: Option<String>,
    collection_view_url: Option<String>,
    track_time_millis: Option<u64>,
}

impl From<ItunesTrack> for CatalogItem {
    fn from(track: ItunesTrack) -> Self {
        CatalogItem {
            title: track.track_name,
            artist: track.artist_name,
            album: track.collection_name,
            release_date: track.release_date,
            genre: track.primary_genre_name,
            artwork: track.artwork_url100,
            preview_url: track.preview_url,
            track_url: track.track_view_url,
            artist_url: track.artist_view_url,
            album_url: track.collection_view_url,
            track_time_ms: track.track_time_millis,
        }
        .sanitized()
    }
}

/// iTunes Search API client
pub struct ItunesClient {
    http_client: Arc<dyn HttpClient>,
    search_url: String,
    timeout: Duration,
}

impl ItunesClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            search_url: ITUNES_SEARCH_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Searches songs in the store of `country`.
    ///
    /// A blank term returns an empty list without a request.
    pub async fn search(&self, term: &str, limit: u32, country: &str) -> Result<Vec<CatalogItem>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let limit = limit.to_string();
        let url = build_url(
            &self.search_url,
            &[
                ("term", term),
                ("media", "music"),
                ("entity", "song"),
                ("limit", limit.as_str()),
                ("country", country),
            ],
        );

        debug!(term = %term, country = %country, "Searching iTunes catalog");

        let response = self
            .http_client
            .execute(HttpRequest::get(url).timeout(self.timeout))
            .await?;

        if !response.is_success() {
            return Err(upstream_error(&response, "External API request failed"));
        }

        let body: SearchResponse = parse_body(&response)?;
        let items: Vec<CatalogItem> = body.results.into_iter().map(CatalogItem::from).collect();

        debug!(count = items.len(), "iTunes search completed");
        Ok(items)
    }
}
