//! # Metadata Reconciliation
//!
//! Turns a noisy video title and channel name into clean search terms, picks
//! the matching secondary catalog entry and finds lyrics.
//!
//! ## Overview
//!
//! This module handles:
//! - Title and channel clean-up ([`normalize`])
//! - Splitting `artist - title` style titles ([`title`])
//! - Ordered `(artist, title)` candidates for the lyrics lookup ([`candidates`])
//! - Picking the confident catalog match ([`matching`])
//! - Outbound links for a resolved track ([`links`])
//! - Lyrics lookup with sequential fallback ([`lyrics`])
//! - Catalog clients for YouTube and iTunes ([`providers`])
//! - Chunked translation through LibreTranslate ([`translate`])
//!
//! Everything from [`normalize`] through [`links`] is synchronous and pure;
//! only the clients perform I/O, through the host's
//! [`HttpClient`](bridge_traits::http::HttpClient).
//!
//! ## Usage
//!
//! ```
//! use core_metadata::{build_candidates, normalize_artist, normalize_title, split_title};
//! use core_metadata::candidates::CandidateSource;
//!
//! let raw_title = "  [MV] Artist Name - Song Title (Live) ";
//! let artist = normalize_artist("Artist Name - Topic");
//! let parts = split_title(&normalize_title(raw_title));
//!
//! let candidates = build_candidates(raw_title, &artist, &parts, None);
//! assert_eq!(candidates.len(), 1);
//! assert_eq!(candidates[0].source, CandidateSource::ParsedTitle);
//! assert_eq!(candidates[0].artist, "Artist Name");
//! assert_eq!(candidates[0].title, "Song Title");
//! ```

pub mod candidates;
pub mod catalog;
pub mod error;
pub mod links;
pub mod lyrics;
pub mod matching;
pub mod normalize;
pub mod providers;
pub mod title;
pub mod translate;

#[cfg(test)]
mod test_support;

pub use candidates::{build_candidates, Candidate, CandidateSource};
pub use catalog::CatalogItem;
pub use error::{MetadataError, Result};
pub use links::{build_links, Link, LinkInput, LinkTargets};
pub use lyrics::{LyricsLookup, LyricsOvhProvider, LyricsProvider, LyricsResolver, LyricsStatus};
pub use matching::select_best;
pub use normalize::{normalize_artist, normalize_title};
pub use title::{split_title, TitleParts};
pub use translate::{LibreTranslateClient, Translation};
