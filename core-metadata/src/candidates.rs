//! # Candidate Generator
//!
//! Produces the ordered list of `(artist, title)` pairs probed against the
//! lyrics service. Earlier candidates are more likely to be right; the
//! resolver stops at the first hit.

use crate::catalog::CatalogItem;
use crate::normalize::normalize_title;
use crate::title::TitleParts;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Where a candidate pair came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Split title read as `artist - title`
    ParsedTitle,
    /// Split title read the other way around
    ParsedTitleSwap,
    /// Channel name paired with the whole title
    ChannelTitle,
    /// Best secondary catalog match
    Itunes,
}

impl CandidateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParsedTitle => "parsed_title",
            Self::ParsedTitleSwap => "parsed_title_swap",
            Self::ChannelTitle => "channel_title",
            Self::Itunes => "itunes",
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `(artist, title)` pair to try.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub source: CandidateSource,
    pub artist: String,
    pub title: String,
}

impl Candidate {
    pub fn new(
        source: CandidateSource,
        artist: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            source,
            artist: artist.into(),
            title: title.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.artist.trim().is_empty() && !self.title.trim().is_empty()
    }

    fn dedup_key(&self) -> (String, String) {
        (self.artist.to_lowercase(), self.title.to_lowercase())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Builds the ordered, deduplicated candidate list.
///
/// * `raw_title` - the title as received, before normalization
/// * `sanitized_artist` - channel name after
///   [`normalize_artist`](crate::normalize::normalize_artist)
/// * `parts` - [`split_title`](crate::title::split_title) of the normalized title
/// * `catalog_item` - best secondary catalog match, if any
///
/// The list may be empty.
pub fn build_candidates(
    raw_title: &str,
    sanitized_artist: &str,
    parts: &TitleParts,
    catalog_item: Option<&CatalogItem>,
) -> Vec<Candidate> {
    let artist = sanitized_artist.trim();
    let mut candidates = Vec::new();

    if !parts.is_empty() {
        let (left, right) = (parts.left(), parts.right());

        if !artist.is_empty() && contains_ignore_case(left, artist) {
            candidates.push(Candidate::new(CandidateSource::ParsedTitle, left, right));
        } else if !artist.is_empty() && contains_ignore_case(right, artist) {
            candidates.push(Candidate::new(CandidateSource::ParsedTitle, right, left));
        } else {
            candidates.push(Candidate::new(CandidateSource::ParsedTitle, left, right));
            candidates.push(Candidate::new(CandidateSource::ParsedTitleSwap, right, left));
        }
    } else if !artist.is_empty() && !raw_title.trim().is_empty() {
        candidates.push(Candidate::new(
            CandidateSource::ChannelTitle,
            artist,
            normalize_title(raw_title),
        ));
    }

    if let Some(item) = catalog_item {
        if let (Some(item_artist), Some(item_title)) = (item.artist(), item.title()) {
            candidates.push(Candidate::new(
                CandidateSource::Itunes,
                item_artist.trim(),
                item_title.trim(),
            ));
        }
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(Candidate::is_complete)
        .filter(|candidate| seen.insert(candidate.dedup_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::title::split_title;

    fn pairs(candidates: &[Candidate]) -> Vec<(CandidateSource, &str, &str)> {
        candidates
            .iter()
            .map(|c| (c.source, c.artist.as_str(), c.title.as_str()))
            .collect()
    }

    #[test]
    fn test_artist_found_on_left() {
        let parts = split_title("Artist Name - Song Title");
        let candidates = build_candidates("", "Artist Name", &parts, None);

        assert_eq!(
            pairs(&candidates),
            vec![(CandidateSource::ParsedTitle, "Artist Name", "Song Title")]
        );
    }

    #[test]
    fn test_artist_found_on_right() {
        let parts = split_title("Song Title - Artist Name");
        let candidates = build_candidates("", "artist name", &parts, None);

        assert_eq!(
            pairs(&candidates),
            vec![(CandidateSource::ParsedTitle, "Artist Name", "Song Title")]
        );
    }

    #[test]
    fn test_ambiguous_order_emits_both_readings() {
        let parts = split_title("X - Y");
        let candidates = build_candidates("", "Z", &parts, None);

        assert_eq!(
            pairs(&candidates),
            vec![
                (CandidateSource::ParsedTitle, "X", "Y"),
                (CandidateSource::ParsedTitleSwap, "Y", "X"),
            ]
        );
    }

    #[test]
    fn test_ambiguous_order_without_artist() {
        let parts = split_title("X - Y");
        let candidates = build_candidates("X - Y", "", &parts, None);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].source, CandidateSource::ParsedTitle);
        assert_eq!(candidates[1].source, CandidateSource::ParsedTitleSwap);
    }

    #[test]
    fn test_channel_title_fallback() {
        let candidates = build_candidates(
            "Song Title (Official Video)",
            "Artist",
            &TitleParts::default(),
            None,
        );

        assert_eq!(
            pairs(&candidates),
            vec![(CandidateSource::ChannelTitle, "Artist", "Song Title")]
        );
    }

    #[test]
    fn test_channel_title_dropped_when_title_is_noise() {
        let candidates =
            build_candidates("(Official Video)", "Artist", &TitleParts::default(), None);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_catalog_item_appended() {
        let parts = split_title("Artist - Song");
        let item = CatalogItem::new("Song (Remastered)", "Artist");
        let candidates = build_candidates("", "Artist", &parts, Some(&item));

        assert_eq!(
            pairs(&candidates),
            vec![
                (CandidateSource::ParsedTitle, "Artist", "Song"),
                (CandidateSource::Itunes, "Artist", "Song (Remastered)"),
            ]
        );
    }

    #[test]
    fn test_catalog_item_without_artist_ignored() {
        let item = CatalogItem {
            title: Some("Song".to_string()),
            ..CatalogItem::default()
        };
        let candidates = build_candidates("", "", &TitleParts::default(), Some(&item));
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_dedup_keeps_earliest_source() {
        let parts = split_title("Artist - Song");
        let item = CatalogItem::new("SONG", "artist");
        let candidates = build_candidates("", "Artist", &parts, Some(&item));

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, CandidateSource::ParsedTitle);
        assert_eq!(candidates[0].artist, "Artist");
    }

    #[test]
    fn test_no_inputs_no_candidates() {
        let candidates = build_candidates("", "", &TitleParts::default(), None);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_candidates_are_unique_and_complete() {
        let parts = split_title("Same - Same");
        let candidates = build_candidates("", "", &parts, None);

        assert_eq!(candidates.len(), 1);
        for candidate in &candidates {
            assert!(!candidate.artist.is_empty());
            assert!(!candidate.title.is_empty());
        }
    }

    #[test]
    fn test_source_serializes_snake_case() {
        let json = serde_json::to_string(&CandidateSource::ParsedTitleSwap).unwrap();
        assert_eq!(json, "\"parsed_title_swap\"");
        assert_eq!(CandidateSource::Itunes.to_string(), "itunes");
    }
}
