//! Playlist repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{Playlist, PlaylistItem};
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};
use tracing::debug;

/// Playlist repository interface for data access operations
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Find a playlist by its ID
    ///
    /// # Returns
    /// - `Ok(Some(playlist))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_by_id(&self, id: &str) -> Result<Option<Playlist>>;

    /// Find a playlist by name, ignoring case and surrounding whitespace
    async fn find_by_name(&self, name: &str) -> Result<Option<Playlist>>;

    /// Insert a new playlist
    ///
    /// # Errors
    /// Returns error if:
    /// - A playlist with the same name exists (`Duplicate`)
    /// - Playlist validation fails
    /// - Database error occurs
    async fn insert(&self, playlist: &Playlist) -> Result<()>;

    /// Delete a playlist and its items
    ///
    /// # Returns
    /// - `Ok(true)` if playlist was deleted
    /// - `Ok(false)` if playlist was not found
    async fn delete(&self, id: &str) -> Result<bool>;

    /// All playlists ordered by name
    async fn list(&self) -> Result<Vec<Playlist>>;

    /// Append an item to its playlist
    ///
    /// # Returns
    /// The stored item with its assigned position
    ///
    /// # Errors
    /// Returns error if:
    /// - The video is already in the playlist (`Duplicate`)
    /// - The playlist does not exist (`NotFound`)
    /// - Item validation fails
    async fn add_item(&self, item: &PlaylistItem) -> Result<PlaylistItem>;

    /// Remove a video from a playlist
    ///
    /// # Returns
    /// `Ok(false)` if the video was not in the playlist
    async fn remove_item(&self, playlist_id: &str, video_id: &str) -> Result<bool>;

    /// Items of a playlist in position order
    async fn items(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>>;

    /// Remove every item of a playlist
    ///
    /// # Returns
    /// Number of removed items
    async fn clear_items(&self, playlist_id: &str) -> Result<u64>;
}

/// SQLite implementation of PlaylistRepository
pub struct SqlitePlaylistRepository {
    pool: SqlitePool,
}

impl SqlitePlaylistRepository {
    /// Create a new SqlitePlaylistRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[async_trait]
impl PlaylistRepository for SqlitePlaylistRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Playlist>> {
        let playlist = query_as::<_, Playlist>("SELECT * FROM playlists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(playlist)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Playlist>> {
        let playlist = query_as::<_, Playlist>("SELECT * FROM playlists WHERE normalized_name = ?")
            .bind(Playlist::normalize_name(name))
            .fetch_optional(&self.pool)
            .await?;

        Ok(playlist)
    }

    async fn insert(&self, playlist: &Playlist) -> Result<()> {
        playlist
            .validate()
            .map_err(|e| LibraryError::InvalidInput {
                field: "Playlist".to_string(),
                message: e,
            })?;

        query(
            r#"
            INSERT INTO playlists (id, name, normalized_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&playlist.id)
        .bind(&playlist.name)
        .bind(&playlist.normalized_name)
        .bind(playlist.created_at)
        .bind(playlist.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                LibraryError::Duplicate {
                    entity_type: "Playlist".to_string(),
                    key: playlist.name.clone(),
                }
            } else {
                LibraryError::Database(e)
            }
        })?;

        debug!(playlist_id = %playlist.id, "Playlist created");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        query("DELETE FROM playlist_items WHERE playlist_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = query("DELETE FROM playlists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Playlist>> {
        let playlists =
            query_as::<_, Playlist>("SELECT * FROM playlists ORDER BY normalized_name ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(playlists)
    }

    async fn add_item(&self, item: &PlaylistItem) -> Result<PlaylistItem> {
        item.validate().map_err(|e| LibraryError::InvalidInput {
            field: "PlaylistItem".to_string(),
            message: e,
        })?;

        let mut tx = self.pool.begin().await?;

        let (position,): (i64,) = query_as(
            r#"
            INSERT INTO playlist_items (
                id, playlist_id, video_id, title, channel_title, position, created_at, updated_at
            )
            VALUES (
                ?, ?, ?, ?, ?,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM playlist_items WHERE playlist_id = ?),
                ?, ?
            )
            RETURNING position
            "#,
        )
        .bind(&item.id)
        .bind(&item.playlist_id)
        .bind(&item.video_id)
        .bind(&item.title)
        .bind(&item.channel_title)
        .bind(&item.playlist_id)
        .bind(item.created_at)
        .bind(item.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                LibraryError::Duplicate {
                    entity_type: "PlaylistItem".to_string(),
                    key: item.video_id.clone(),
                }
            } else if is_foreign_key_violation(&e) {
                LibraryError::NotFound {
                    entity_type: "Playlist".to_string(),
                    id: item.playlist_id.clone(),
                }
            } else {
                LibraryError::Database(e)
            }
        })?;

        query("UPDATE playlists SET updated_at = ? WHERE id = ?")
            .bind(item.updated_at)
            .bind(&item.playlist_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            playlist_id = %item.playlist_id,
            video_id = %item.video_id,
            position,
            "Item added to playlist"
        );

        Ok(PlaylistItem {
            position,
            ..item.clone()
        })
    }

    async fn remove_item(&self, playlist_id: &str, video_id: &str) -> Result<bool> {
        let result = query("DELETE FROM playlist_items WHERE playlist_id = ? AND video_id = ?")
            .bind(playlist_id)
            .bind(video_id.trim())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn items(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>> {
        let items = query_as::<_, PlaylistItem>(
            "SELECT * FROM playlist_items WHERE playlist_id = ? ORDER BY position ASC",
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn clear_items(&self, playlist_id: &str) -> Result<u64> {
        let result = query("DELETE FROM playlist_items WHERE playlist_id = ?")
            .bind(playlist_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::models::NewPlaylistItem;

    async fn setup_repo() -> SqlitePlaylistRepository {
        SqlitePlaylistRepository::new(create_test_pool().await.unwrap())
    }

    fn item(playlist: &Playlist, video_id: &str, title: &str) -> PlaylistItem {
        PlaylistItem::new(
            &playlist.id,
            NewPlaylistItem::new(video_id, title, Some("Channel".to_string())),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find_playlist() {
        let repo = setup_repo().await;

        let playlist = Playlist::new("  Night Drive ");
        repo.insert(&playlist).await.unwrap();

        let found = repo.find_by_id(&playlist.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Night Drive");

        let by_name = repo.find_by_name("NIGHT drive").await.unwrap().unwrap();
        assert_eq!(by_name.id, playlist.id);

        assert!(repo.find_by_name("Day Drive").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_ignores_case() {
        let repo = setup_repo().await;

        repo.insert(&Playlist::new("Favorites")).await.unwrap();
        let result = repo.insert(&Playlist::new(" favorites ")).await;

        assert!(matches!(result, Err(LibraryError::Duplicate { .. })));
        let playlists = repo.list().await.unwrap();
        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].name, "Favorites");
    }

    #[tokio::test]
    async fn test_playlist_validation() {
        let repo = setup_repo().await;

        let result = repo.insert(&Playlist::new("  ")).await;
        assert!(matches!(result, Err(LibraryError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let repo = setup_repo().await;

        for name in ["beta", "Alpha", "gamma"] {
            repo.insert(&Playlist::new(name)).await.unwrap();
        }

        let names: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Alpha", "beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_items_keep_insertion_order() {
        let repo = setup_repo().await;
        let playlist = Playlist::new("Mix");
        repo.insert(&playlist).await.unwrap();

        let first = repo.add_item(&item(&playlist, "v1", "First")).await.unwrap();
        let second = repo.add_item(&item(&playlist, "v2", "Second")).await.unwrap();
        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);

        let items = repo.items(&playlist.id).await.unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.video_id.as_str()).collect();
        assert_eq!(ids, ["v1", "v2"]);
        assert_eq!(items[0].channel_title.as_deref(), Some("Channel"));
    }

    #[tokio::test]
    async fn test_duplicate_video_in_playlist() {
        let repo = setup_repo().await;
        let playlist = Playlist::new("Mix");
        repo.insert(&playlist).await.unwrap();

        repo.add_item(&item(&playlist, "v1", "First")).await.unwrap();
        let result = repo.add_item(&item(&playlist, " v1 ", "Again")).await;

        assert!(matches!(result, Err(LibraryError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_same_video_in_two_playlists() {
        let repo = setup_repo().await;
        let a = Playlist::new("A");
        let b = Playlist::new("B");
        repo.insert(&a).await.unwrap();
        repo.insert(&b).await.unwrap();

        repo.add_item(&item(&a, "v1", "Song")).await.unwrap();
        let added = repo.add_item(&item(&b, "v1", "Song")).await.unwrap();

        assert_eq!(added.position, 0);
    }

    #[tokio::test]
    async fn test_add_item_to_missing_playlist() {
        let repo = setup_repo().await;
        let ghost = Playlist::new("Ghost");

        let result = repo.add_item(&item(&ghost, "v1", "Song")).await;
        assert!(matches!(result, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_remove_and_clear_items() {
        let repo = setup_repo().await;
        let playlist = Playlist::new("Mix");
        repo.insert(&playlist).await.unwrap();

        for (id, title) in [("v1", "One"), ("v2", "Two"), ("v3", "Three")] {
            repo.add_item(&item(&playlist, id, title)).await.unwrap();
        }

        assert!(repo.remove_item(&playlist.id, "v2").await.unwrap());
        assert!(!repo.remove_item(&playlist.id, "v2").await.unwrap());

        let next = repo.add_item(&item(&playlist, "v4", "Four")).await.unwrap();
        assert_eq!(next.position, 3);

        assert_eq!(repo.clear_items(&playlist.id).await.unwrap(), 3);
        assert!(repo.items(&playlist.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_playlist_removes_items() {
        let repo = setup_repo().await;
        let playlist = Playlist::new("Mix");
        repo.insert(&playlist).await.unwrap();
        repo.add_item(&item(&playlist, "v1", "One")).await.unwrap();

        assert!(repo.delete(&playlist.id).await.unwrap());
        assert!(!repo.delete(&playlist.id).await.unwrap());
        assert!(repo.find_by_id(&playlist.id).await.unwrap().is_none());
        assert!(repo.items(&playlist.id).await.unwrap().is_empty());
    }
}
