//! # Link Builder
//!
//! Outbound links shown next to a resolved track: the video and channel
//! pages, the store page, an encyclopedia search and a review search.

use crate::catalog::CatalogItem;
use serde::{Deserialize, Serialize};

/// A labelled outbound URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Link {
    fn new(label: &str, url: String) -> Self {
        Self {
            label: label.to_string(),
            url,
        }
    }
}

pub const VIDEO_LABEL: &str = "YouTube";
pub const CHANNEL_LABEL: &str = "YouTube Channel";
pub const STORE_LABEL: &str = "iTunes";
pub const ENCYCLOPEDIA_LABEL: &str = "Wikipedia";
pub const REVIEWS_LABEL: &str = "Reviews";

/// Endpoints the links are composed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTargets {
    /// Prefix completed with a video id
    pub video: String,
    /// Prefix completed with a channel id
    pub channel: String,
    /// Prefix completed with an encoded search term
    pub encyclopedia: String,
    /// Prefix completed with an encoded search term
    pub reviews: String,
    /// Word appended to the review search
    pub review_qualifier: String,
}

impl Default for LinkTargets {
    fn default() -> Self {
        Self {
            video: "https://www.youtube.com/watch?v=".to_string(),
            channel: "https://www.youtube.com/channel/".to_string(),
            encyclopedia: "https://ja.wikipedia.org/w/index.php?search=".to_string(),
            reviews: "https://www.google.com/search?q=".to_string(),
            review_qualifier: "レビュー".to_string(),
        }
    }
}

/// Resolved fields the links are derived from.
#[derive(Debug, Clone, Default)]
pub struct LinkInput<'a> {
    pub title: &'a str,
    pub artist: &'a str,
    pub query: Option<&'a str>,
    pub video_id: Option<&'a str>,
    pub channel_id: Option<&'a str>,
    pub catalog_item: Option<&'a CatalogItem>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn first_present<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    values.into_iter().find_map(present)
}

/// Builds links with the default endpoints.
pub fn build_links(input: &LinkInput<'_>) -> Vec<Link> {
    build_links_with(&LinkTargets::default(), input)
}

/// Builds links in display order. Only links whose driving field is present
/// are emitted; an empty input yields no links.
pub fn build_links_with(targets: &LinkTargets, input: &LinkInput<'_>) -> Vec<Link> {
    let mut links = Vec::new();
    let catalog_title = input.catalog_item.and_then(CatalogItem::title);
    let catalog_artist = input.catalog_item.and_then(CatalogItem::artist);

    if let Some(video_id) = present(input.video_id) {
        links.push(Link::new(
            VIDEO_LABEL,
            format!("{}{}", targets.video, urlencoding::encode(video_id)),
        ));
    }

    if let Some(channel_id) = present(input.channel_id) {
        links.push(Link::new(
            CHANNEL_LABEL,
            format!("{}{}", targets.channel, urlencoding::encode(channel_id)),
        ));
    }

    let track_url = input.catalog_item.and_then(|item| item.track_url.as_deref());
    if let Some(track_url) = present(track_url) {
        links.push(Link::new(STORE_LABEL, track_url.to_string()));
    }

    if let Some(term) = first_present([
        catalog_artist,
        Some(input.artist),
        Some(input.title),
        input.query,
    ]) {
        links.push(Link::new(
            ENCYCLOPEDIA_LABEL,
            format!("{}{}", targets.encyclopedia, urlencoding::encode(term)),
        ));
    }

    let review_title = first_present([catalog_title, Some(input.title)]).unwrap_or_default();
    let review_artist = first_present([catalog_artist, Some(input.artist)]).unwrap_or_default();
    let review_subject = format!("{} {}", review_title, review_artist);
    let review_subject = review_subject.trim();

    if !review_subject.is_empty() {
        let term = format!("{} {}", review_subject, targets.review_qualifier);
        links.push(Link::new(
            REVIEWS_LABEL,
            format!("{}{}", targets.reviews, urlencoding::encode(term.trim())),
        ));
    }

    links
}
