//! Core service façade and bootstrap helpers.
//!
//! [`DiscoveryService`] wires the host-provided HTTP bridge and the playlist
//! database into the shared core. It serves video search and details, runs
//! the metadata reconciliation pipeline over a video, translates lyrics and
//! manages named playlists.
//!
//! Desktop apps typically enable the `desktop-shims` feature, which lets
//! [`DiscoveryConfig`] fall back to the reqwest-backed HTTP client.
//!
//! ```no_run
//! # async fn example() -> core_service::Result<()> {
//! use core_service::{DiscoveryConfig, DiscoveryService, EnrichmentRequest};
//!
//! let service = DiscoveryService::bootstrap(DiscoveryConfig::from_env()?).await?;
//!
//! let enrichment = service
//!     .enrich(EnrichmentRequest::new("[MV] Artist - Song (Live)", "Artist - Topic"))
//!     .await?;
//! println!("{:?}", enrichment.lyrics.status);
//! # Ok(())
//! # }
//! ```

pub mod enrichment;
pub mod error;

pub use core_library::{NewPlaylistItem, Playlist, PlaylistItem};
pub use core_runtime::DiscoveryConfig;
pub use enrichment::{Enrichment, EnrichmentRequest};
pub use error::{CoreError, Result};

use core_library::db::{create_pool, DatabaseConfig};
use core_library::{LibraryError, PlaylistRepository, SqlitePlaylistRepository};
use core_metadata::links::{build_links_with, LinkInput, LinkTargets};
use core_metadata::providers::{
    ChannelDetails, ItunesClient, VideoDetails, VideoSummary, YouTubeClient,
};
use core_metadata::{
    build_candidates, normalize_artist, normalize_title, select_best, split_title,
    LibreTranslateClient, LyricsOvhProvider, LyricsProvider, LyricsResolver, Translation,
};
use enrichment::{catalog_target, catalog_term};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A video with its channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDetails {
    pub video: VideoDetails,
    /// `None` when the channel could not be fetched
    pub channel: Option<ChannelDetails>,
    /// Video duration as `m:ss` or `h:mm:ss`
    pub duration: Option<String>,
}

/// Primary façade exposed to host applications.
pub struct DiscoveryService {
    config: DiscoveryConfig,
    youtube: Option<YouTubeClient>,
    itunes: ItunesClient,
    lyrics: LyricsResolver,
    translator: LibreTranslateClient,
    playlists: Arc<dyn PlaylistRepository>,
    link_targets: LinkTargets,
}

impl DiscoveryService {
    /// Create a new service from a validated configuration and a playlist
    /// store.
    pub fn new(config: DiscoveryConfig, playlists: Arc<dyn PlaylistRepository>) -> Self {
        let http = Arc::clone(&config.http_client);
        let request_timeout = config.timeouts.request;

        let youtube = config.youtube_api_key.as_ref().map(|key| {
            YouTubeClient::new(Arc::clone(&http), key.clone()).with_timeout(request_timeout)
        });
        let itunes = ItunesClient::new(Arc::clone(&http)).with_timeout(request_timeout);
        let lyrics = LyricsResolver::new(Arc::new(
            LyricsOvhProvider::new(Arc::clone(&http)).with_timeout(request_timeout),
        ));
        let translator = LibreTranslateClient::new(http, config.libretranslate_url.clone())
            .with_max_chunk_chars(config.translation.max_chunk_chars)
            .with_timeout(config.timeouts.translate);

        if youtube.is_none() {
            warn!("YouTube API key not configured; search and details are unavailable");
        }

        Self {
            config,
            youtube,
            itunes,
            lyrics,
            translator,
            playlists,
            link_targets: LinkTargets::default(),
        }
    }

    /// Opens the playlist database at `config.database_path`, running
    /// migrations, and creates the service.
    pub async fn bootstrap(config: DiscoveryConfig) -> Result<Self> {
        let pool = create_pool(DatabaseConfig::new(config.database_path.clone())).await?;
        info!(database = %config.database_path.display(), "Discovery service ready");
        Ok(Self::new(config, Arc::new(SqlitePlaylistRepository::new(pool))))
    }

    /// Replaces the lyrics provider.
    pub fn with_lyrics_provider(mut self, provider: Arc<dyn LyricsProvider>) -> Self {
        self.lyrics = LyricsResolver::new(provider);
        self
    }

    /// Replaces the endpoints outbound links point at.
    pub fn with_link_targets(mut self, targets: LinkTargets) -> Self {
        self.link_targets = targets;
        self
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    fn youtube(&self) -> Result<&YouTubeClient> {
        self.youtube.as_ref().ok_or(CoreError::MissingApiKey)
    }

    // =========================================================================
    // Video catalog
    // =========================================================================

    /// Searches videos. A blank query yields an empty list.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<VideoSummary>> {
        let youtube = self.youtube()?;

        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let videos = youtube
            .search_videos(
                query,
                self.config.search.max_results,
                Some(self.config.search.relevance_language.as_str()),
            )
            .await?;

        Ok(videos)
    }

    /// Fetches a video and its channel.
    ///
    /// A failing channel lookup leaves `channel` empty instead of failing the
    /// call.
    #[instrument(skip(self))]
    pub async fn details(&self, video_id: &str) -> Result<TrackDetails> {
        let youtube = self.youtube()?;

        let video_id = video_id.trim();
        if video_id.is_empty() {
            return Err(CoreError::MissingInput("video_id"));
        }

        let video = youtube
            .video_details(video_id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "Video",
                id: video_id.to_string(),
            })?;

        let channel_id = video
            .channel_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());

        let channel = match channel_id {
            Some(channel_id) => match youtube.channel_details(channel_id).await {
                Ok(channel) => channel,
                Err(e) => {
                    warn!(channel_id, error = %e, "Channel lookup failed");
                    None
                }
            },
            None => None,
        };

        Ok(TrackDetails {
            duration: video.formatted_duration(),
            video,
            channel,
        })
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Resolves artist, title, catalog entry, lyrics and links for a video.
    ///
    /// Upstream failures never fail the enrichment: a failed catalog search
    /// counts as no results and lyrics failures are recorded per attempt.
    #[instrument(skip(self, request), fields(video_id = ?request.video_id))]
    pub async fn enrich(&self, request: EnrichmentRequest) -> Result<Enrichment> {
        let normalized_title = normalize_title(&request.title);
        let sanitized_artist = normalize_artist(&request.channel_title);
        let parts = split_title(&normalized_title);

        let preliminary = build_candidates(&request.title, &sanitized_artist, &parts, None);
        let (wanted_title, wanted_artist) =
            catalog_target(&preliminary, &normalized_title, &sanitized_artist);

        let catalog_results = match self
            .itunes
            .search(
                &catalog_term(wanted_title, wanted_artist),
                self.config.catalog.limit,
                &self.config.catalog.country,
            )
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "Catalog search failed; continuing without catalog match");
                Vec::new()
            }
        };

        let catalog_match = select_best(&catalog_results, wanted_title, wanted_artist).cloned();
        debug!(
            matched = catalog_match.is_some(),
            results = catalog_results.len(),
            "Catalog match selected"
        );

        let candidates = build_candidates(
            &request.title,
            &sanitized_artist,
            &parts,
            catalog_match.as_ref(),
        );
        let lyrics = self.lyrics.resolve(&candidates).await;

        let (link_title, link_artist) = lyrics
            .matched
            .as_ref()
            .or_else(|| candidates.first())
            .map(|c| (c.title.as_str(), c.artist.as_str()))
            .unwrap_or((normalized_title.as_str(), sanitized_artist.as_str()));

        let links = build_links_with(
            &self.link_targets,
            &LinkInput {
                title: link_title,
                artist: link_artist,
                query: request.query.as_deref(),
                video_id: request.video_id.as_deref(),
                channel_id: request.channel_id.as_deref(),
                catalog_item: catalog_match.as_ref(),
            },
        );

        info!(
            candidates = candidates.len(),
            lyrics = ?lyrics.status,
            links = links.len(),
            "Enrichment completed"
        );

        Ok(Enrichment {
            normalized_title,
            sanitized_artist,
            parts,
            candidates,
            catalog_match,
            lyrics,
            links,
        })
    }

    /// Translates text into `target`, or into the configured language.
    #[instrument(skip(self, text))]
    pub async fn translate(&self, text: &str, target: Option<&str>) -> Result<Translation> {
        let target = target
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.config.translation.target.as_str());

        let translation = self
            .translator
            .translate(text, &self.config.translation.source, target)
            .await?;

        Ok(translation)
    }

    // =========================================================================
    // Playlists
    // =========================================================================

    /// Creates a playlist. Names are unique regardless of case.
    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        if name.trim().is_empty() {
            return Err(CoreError::MissingInput("name"));
        }

        let playlist = Playlist::new(name);
        self.playlists.insert(&playlist).await?;
        info!(playlist_id = %playlist.id, name = %playlist.name, "Playlist created");

        Ok(playlist)
    }

    /// Returns the playlist called `name`, creating it when missing.
    pub async fn find_or_create_playlist(&self, name: &str) -> Result<Playlist> {
        if let Some(playlist) = self.playlists.find_by_name(name).await? {
            return Ok(playlist);
        }

        match self.create_playlist(name).await {
            // created concurrently
            Err(CoreError::Library(LibraryError::Duplicate { .. })) => {
                self.playlist_named(name).await
            }
            other => other,
        }
    }

    pub async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self.playlists.list().await?)
    }

    /// Deletes a playlist with its items. `Ok(false)` when it does not exist.
    pub async fn delete_playlist(&self, name: &str) -> Result<bool> {
        match self.playlists.find_by_name(name).await? {
            Some(playlist) => Ok(self.playlists.delete(&playlist.id).await?),
            None => Ok(false),
        }
    }

    /// Saves a video to the playlist called `name`, creating the playlist
    /// when missing.
    pub async fn add_to_playlist(&self, name: &str, item: NewPlaylistItem) -> Result<PlaylistItem> {
        let playlist = self.find_or_create_playlist(name).await?;
        let stored = self
            .playlists
            .add_item(&PlaylistItem::new(&playlist.id, item))
            .await?;

        Ok(stored)
    }

    /// Removes a video from a playlist. `Ok(false)` when it was not there.
    pub async fn remove_from_playlist(&self, name: &str, video_id: &str) -> Result<bool> {
        let playlist = self.playlist_named(name).await?;
        Ok(self.playlists.remove_item(&playlist.id, video_id).await?)
    }

    pub async fn playlist_items(&self, name: &str) -> Result<Vec<PlaylistItem>> {
        let playlist = self.playlist_named(name).await?;
        Ok(self.playlists.items(&playlist.id).await?)
    }

    /// Empties a playlist and returns how many items it held.
    pub async fn clear_playlist(&self, name: &str) -> Result<u64> {
        let playlist = self.playlist_named(name).await?;
        Ok(self.playlists.clear_items(&playlist.id).await?)
    }

    async fn playlist_named(&self, name: &str) -> Result<Playlist> {
        self.playlists
            .find_by_name(name)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "Playlist",
                id: name.trim().to_string(),
            })
    }
}
