//! Secondary catalog records.

use serde::{Deserialize, Serialize};

/// One track returned by the secondary catalog search.
///
/// Every field is optional. Blank strings never survive construction through
/// [`CatalogItem::sanitized`], so `Some` always carries text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub artwork: Option<String>,
    pub preview_url: Option<String>,
    pub track_url: Option<String>,
    pub artist_url: Option<String>,
    pub album_url: Option<String>,
    pub track_time_ms: Option<u64>,
}

impl CatalogItem {
    /// Shorthand for an item carrying only a title and an artist.
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            artist: Some(artist.into()),
            ..Self::default()
        }
        .sanitized()
    }

    pub fn with_track_url(mut self, url: impl Into<String>) -> Self {
        self.track_url = non_blank(Some(url.into()));
        self
    }

    /// Trims every text field and turns blank ones into `None`.
    pub fn sanitized(self) -> Self {
        Self {
            title: non_blank(self.title),
            artist: non_blank(self.artist),
            album: non_blank(self.album),
            release_date: non_blank(self.release_date),
            genre: non_blank(self.genre),
            artwork: non_blank(self.artwork),
            preview_url: non_blank(self.preview_url),
            track_url: non_blank(self.track_url),
            artist_url: non_blank(self.artist_url),
            album_url: non_blank(self.album_url),
            track_time_ms: self.track_time_ms,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref().filter(|s| !s.trim().is_empty())
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
