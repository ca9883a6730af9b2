//! # Playlist Library
//!
//! Owns the playlist database and provides repository patterns for data
//! access.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite connection pooling and migrations ([`db`])
//! - Playlist and playlist item models with validation ([`models`])
//! - The playlist repository ([`repositories`])

pub mod db;
pub mod error;
pub mod models;
pub mod repositories;

pub use error::{LibraryError, Result};
pub use models::{NewPlaylistItem, Playlist, PlaylistItem};
pub use repositories::{PlaylistRepository, SqlitePlaylistRepository};
