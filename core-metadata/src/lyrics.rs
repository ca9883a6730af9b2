//! # Lyrics Lookup Module
//!
//! Probes a lyrics provider with candidate `(artist, title)` pairs until one
//! of them has lyrics.
//!
//! ## Overview
//!
//! - [`LyricsProvider`] is the collaborator contract: lyrics, "not found", or
//!   an error.
//! - [`LyricsOvhProvider`] implements it against lyrics.ovh.
//! - [`LyricsResolver`] runs the sequential fallback over the candidates
//!   produced by [`build_candidates`](crate::candidates::build_candidates),
//!   keeping a diagnostic record of every attempt.
//!
//! A failing attempt never aborts the loop. Only when every candidate has
//! been tried without success is the lookup reported as not found.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_metadata::lyrics::{LyricsOvhProvider, LyricsResolver};
//! use std::sync::Arc;
//!
//! let resolver = LyricsResolver::new(Arc::new(LyricsOvhProvider::new(http_client)));
//! let lookup = resolver.resolve(&candidates).await;
//!
//! if let Some(matched) = &lookup.matched {
//!     println!("Lyrics found via {}", matched.source);
//! }
//! ```

use crate::candidates::Candidate;
use crate::error::{MetadataError, Result};
use crate::providers::{parse_body, upstream_error};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// lyrics.ovh API base URL
pub const LYRICS_OVH_API_BASE: &str = "https://api.lyrics.ovh/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(6);

// =============================================================================
// Provider Trait
// =============================================================================

/// Trait for lyrics provider implementations
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Fetch lyrics for a track
    ///
    /// # Returns
    /// * `Ok(Some(lyrics))` if lyrics found
    /// * `Ok(None)` if lyrics not found
    /// * `Err` if API error or network failure
    async fn fetch(&self, artist: &str, title: &str) -> Result<Option<String>>;

    /// Short provider name used in logs
    fn name(&self) -> &'static str;
}

// =============================================================================
// Lookup Records
// =============================================================================

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum LyricsOutcome {
    Found,
    NotFound,
    Failed(String),
}

/// Diagnostic record of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsAttempt {
    pub candidate: Candidate,
    pub outcome: LyricsOutcome,
}

/// Overall lookup status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LyricsStatus {
    Found,
    NotFound,
    /// There was nothing to probe
    NoCandidates,
}

/// Result of a lyrics lookup over a candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsLookup {
    pub status: LyricsStatus,
    pub lyrics: Option<String>,
    /// The candidate that produced the lyrics
    pub matched: Option<Candidate>,
    /// Every probe in the order it was made
    pub attempts: Vec<LyricsAttempt>,
}

impl LyricsLookup {
    fn no_candidates() -> Self {
        Self {
            status: LyricsStatus::NoCandidates,
            lyrics: None,
            matched: None,
            attempts: Vec::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.status == LyricsStatus::Found
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Sequential fallback over candidates.
pub struct LyricsResolver {
    provider: Arc<dyn LyricsProvider>,
}

impl LyricsResolver {
    pub fn new(provider: Arc<dyn LyricsProvider>) -> Self {
        Self { provider }
    }

    /// Tries each candidate in order and stops at the first one with lyrics.
    ///
    /// Never fails: provider errors are recorded on the attempt and the loop
    /// moves on to the next candidate.
    #[instrument(
        skip(self, candidates),
        fields(provider = self.provider.name(), candidates = candidates.len())
    )]
    pub async fn resolve(&self, candidates: &[Candidate]) -> LyricsLookup {
        if candidates.is_empty() {
            debug!("No lyrics candidates to try");
            return LyricsLookup::no_candidates();
        }

        let mut attempts = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            debug!(
                source = %candidate.source,
                artist = %candidate.artist,
                title = %candidate.title,
                "Attempting to fetch lyrics"
            );

            match self.provider.fetch(&candidate.artist, &candidate.title).await {
                Ok(Some(lyrics)) => {
                    info!(
                        source = %candidate.source,
                        attempt = attempts.len() + 1,
                        "Lyrics found"
                    );
                    attempts.push(LyricsAttempt {
                        candidate: candidate.clone(),
                        outcome: LyricsOutcome::Found,
                    });
                    return LyricsLookup {
                        status: LyricsStatus::Found,
                        lyrics: Some(lyrics),
                        matched: Some(candidate.clone()),
                        attempts,
                    };
                }
                Ok(None) => {
                    debug!(source = %candidate.source, "Lyrics not found for candidate");
                    attempts.push(LyricsAttempt {
                        candidate: candidate.clone(),
                        outcome: LyricsOutcome::NotFound,
                    });
                }
                Err(e) => {
                    warn!(source = %candidate.source, error = %e, "Lyrics fetch failed");
                    attempts.push(LyricsAttempt {
                        candidate: candidate.clone(),
                        outcome: LyricsOutcome::Failed(e.to_string()),
                    });
                }
            }
        }

        info!(attempts = attempts.len(), "No lyrics found for any candidate");
        LyricsLookup {
            status: LyricsStatus::NotFound,
            lyrics: None,
            matched: None,
            attempts,
        }
    }
}

// =============================================================================
// lyrics.ovh
// =============================================================================

/// lyrics.ovh client
pub struct LyricsOvhProvider {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct LyricsOvhResponse {
    #[serde(default)]
    lyrics: Option<String>,
}

impl LyricsOvhProvider {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: LYRICS_OVH_API_BASE.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Point the provider at another deployment of the same API
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn lyrics_url(&self, artist: &str, title: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        )
    }
}

#[async_trait]
impl LyricsProvider for LyricsOvhProvider {
    async fn fetch(&self, artist: &str, title: &str) -> Result<Option<String>> {
        let (artist, title) = (artist.trim(), title.trim());
        if artist.is_empty() || title.is_empty() {
            return Err(MetadataError::MissingInput("artist_or_title"));
        }

        let url = self.lyrics_url(artist, title);
        debug!(url = %url, "Requesting lyrics");

        let response = self
            .http_client
            .execute(HttpRequest::get(url).timeout(self.timeout))
            .await?;

        if response.status == 404 {
            return Ok(None);
        }

        if !response.is_success() {
            return Err(upstream_error(&response, "Lyrics request failed"));
        }

        let body: LyricsOvhResponse = parse_body(&response)?;

        Ok(body
            .lyrics
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()))
    }

    fn name(&self) -> &'static str {
        "lyrics.ovh"
    }
}
