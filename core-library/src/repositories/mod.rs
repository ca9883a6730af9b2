//! # Repository Pattern Implementation
//!
//! Repository traits and their SQLite implementations.
//!
//! ## Architecture
//!
//! - Traits define the interface for each repository
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>` for error handling
//!
//! ## Available Repositories
//!
//! - `PlaylistRepository` - Named playlists and the videos saved to them

pub mod playlist;

pub use playlist::{PlaylistRepository, SqlitePlaylistRepository};
