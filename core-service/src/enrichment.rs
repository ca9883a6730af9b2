//! Enrichment request and result records.

use core_metadata::{Candidate, CatalogItem, Link, LyricsLookup, TitleParts};
use serde::{Deserialize, Serialize};

/// What is known about a video when it is enriched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRequest {
    /// Raw video title
    pub title: String,
    /// Raw channel name
    pub channel_title: String,
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
    /// Search query the video was found with
    pub query: Option<String>,
}

impl EnrichmentRequest {
    pub fn new(title: impl Into<String>, channel_title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            channel_title: channel_title.into(),
            ..Self::default()
        }
    }

    pub fn with_video_id(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

/// Everything the reconciliation pipeline resolved for one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub normalized_title: String,
    pub sanitized_artist: String,
    pub parts: TitleParts,
    /// Candidates in the order they were probed
    pub candidates: Vec<Candidate>,
    /// Confident secondary catalog match
    pub catalog_match: Option<CatalogItem>,
    pub lyrics: LyricsLookup,
    pub links: Vec<Link>,
}

/// `(title, artist)` the secondary catalog is searched and scored with.
///
/// The first candidate wins; without candidates the cleaned video title and
/// channel name are used.
pub(crate) fn catalog_target<'a>(
    candidates: &'a [Candidate],
    normalized_title: &'a str,
    sanitized_artist: &'a str,
) -> (&'a str, &'a str) {
    candidates
        .first()
        .map(|c| (c.title.as_str(), c.artist.as_str()))
        .unwrap_or((normalized_title, sanitized_artist))
}

/// Search term for a catalog target: `"artist title"`.
pub(crate) fn catalog_term(title: &str, artist: &str) -> String {
    format!("{} {}", artist.trim(), title.trim()).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_metadata::CandidateSource;

    #[test]
    fn test_catalog_target_prefers_first_candidate() {
        let candidates = vec![
            Candidate::new(CandidateSource::ParsedTitle, "Foo", "Bar"),
            Candidate::new(CandidateSource::ParsedTitleSwap, "Bar", "Foo"),
        ];

        assert_eq!(catalog_target(&candidates, "Foo - Bar", ""), ("Bar", "Foo"));
        assert_eq!(catalog_target(&[], "Title", "Artist"), ("Title", "Artist"));
    }

    #[test]
    fn test_catalog_term() {
        assert_eq!(catalog_term("Song", "Artist"), "Artist Song");
        assert_eq!(catalog_term("Song", ""), "Song");
        assert_eq!(catalog_term("", ""), "");
    }
}
