//! Domain models for the playlist library
//!
//! This module contains domain models with validation and database mapping.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Named playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Playlist {
    /// Unique identifier
    pub id: String,
    /// Playlist name, trimmed
    pub name: String,
    /// Lowercased name, unique across playlists
    pub normalized_name: String,
    /// Timestamps
    pub created_at: i64,
    pub updated_at: i64,
}

impl Playlist {
    /// Create a new playlist. The name is trimmed.
    pub fn new(name: &str) -> Self {
        let name = name.trim().to_string();
        let now = chrono::Utc::now().timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            normalized_name: Self::normalize_name(&name),
            name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Key playlist names are compared by.
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Validate playlist data
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Playlist name cannot be empty".to_string());
        }

        if self.normalized_name != Self::normalize_name(&self.name) {
            return Err("Normalized name does not match name".to_string());
        }

        Ok(())
    }
}

/// Fields supplied when saving a video to a playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlaylistItem {
    pub video_id: String,
    pub title: String,
    pub channel_title: Option<String>,
}

impl NewPlaylistItem {
    pub fn new(
        video_id: impl Into<String>,
        title: impl Into<String>,
        channel_title: Option<String>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            channel_title,
        }
    }
}

/// Video saved to a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PlaylistItem {
    /// Unique identifier
    pub id: String,
    pub playlist_id: String,
    pub video_id: String,
    pub title: String,
    pub channel_title: Option<String>,
    /// Zero-based position, assigned by the repository on insertion
    pub position: i64,
    /// Timestamps
    pub created_at: i64,
    pub updated_at: i64,
}

impl PlaylistItem {
    /// Create an item for `playlist_id`. Text fields are trimmed and a blank
    /// channel title becomes `None`.
    pub fn new(playlist_id: &str, item: NewPlaylistItem) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            playlist_id: playlist_id.to_string(),
            video_id: item.video_id.trim().to_string(),
            title: item.title.trim().to_string(),
            channel_title: item
                .channel_title
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate item data
    pub fn validate(&self) -> Result<(), String> {
        if self.playlist_id.trim().is_empty() {
            return Err("Playlist id cannot be empty".to_string());
        }

        if self.video_id.trim().is_empty() {
            return Err("Video id cannot be empty".to_string());
        }

        if self.title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }

        if self.position < 0 {
            return Err(format!("Invalid position: {}", self.position));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_new_trims_and_normalizes() {
        let playlist = Playlist::new("  Night Drive ");

        assert_eq!(playlist.name, "Night Drive");
        assert_eq!(playlist.normalized_name, "night drive");
        assert!(playlist.validate().is_ok());
        assert!(Uuid::parse_str(&playlist.id).is_ok());
    }

    #[test]
    fn test_playlist_blank_name_is_invalid() {
        assert!(Playlist::new("   ").validate().is_err());
    }

    #[test]
    fn test_playlist_stale_normalized_name_is_invalid() {
        let mut playlist = Playlist::new("Old");
        playlist.name = "New".to_string();
        assert!(playlist.validate().is_err());
    }

    #[test]
    fn test_item_new_trims_fields() {
        let item = PlaylistItem::new(
            "p1",
            NewPlaylistItem::new(" x8VYWazR5mE ", " 夜に駆ける ", Some("  ".to_string())),
        );

        assert_eq!(item.video_id, "x8VYWazR5mE");
        assert_eq!(item.title, "夜に駆ける");
        assert_eq!(item.channel_title, None);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_item_requires_video_id_and_title() {
        let no_video = PlaylistItem::new("p1", NewPlaylistItem::new(" ", "Title", None));
        assert!(no_video.validate().is_err());

        let no_title = PlaylistItem::new("p1", NewPlaylistItem::new("vid", "", None));
        assert!(no_title.validate().is_err());
    }
}
