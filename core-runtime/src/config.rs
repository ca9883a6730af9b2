//! # Discovery Configuration Module
//!
//! Provides configuration management for the discovery core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `DiscoveryConfig` instance holding the injected HTTP client, upstream
//! credentials and endpoints, and the limits each upstream call is issued
//! with. The builder validates eagerly so a misconfigured host fails at
//! startup rather than on the first request.
//!
//! ## Environment
//!
//! [`DiscoveryConfig::from_env`] reads:
//!
//! | Variable                     | Default                  |
//! |------------------------------|--------------------------|
//! | `YOUTUBE_API_KEY`            | unset (search disabled)  |
//! | `LIBRETRANSLATE_URL`         | `http://localhost:65000` |
//! | `DISCOVERY_DATABASE_PATH`    | `discovery.db`           |
//! | `DISCOVERY_MAX_RESULTS`      | `12`                     |
//! | `DISCOVERY_COUNTRY`          | `JP`                     |
//! | `DISCOVERY_TRANSLATE_TARGET` | `ja`                     |
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::DiscoveryConfig;
//! use std::sync::Arc;
//!
//! let config = DiscoveryConfig::builder()
//!     .database_path("/var/lib/discovery/discovery.db")
//!     .youtube_api_key(std::env::var("YOUTUBE_API_KEY")?)
//!     .http_client(Arc::new(MyHttpClient))
//!     .build()?;
//! ```
//!
//! With the `desktop-shims` feature enabled the reqwest-backed client from
//! `bridge-desktop` is injected when none is provided.

use crate::error::{Error, Result};
use crate::logging::redact_if_sensitive;
use bridge_traits::HttpClient;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_LIBRETRANSLATE_URL: &str = "LIBRETRANSLATE_URL";
pub const ENV_DATABASE_PATH: &str = "DISCOVERY_DATABASE_PATH";
pub const ENV_MAX_RESULTS: &str = "DISCOVERY_MAX_RESULTS";
pub const ENV_COUNTRY: &str = "DISCOVERY_COUNTRY";
pub const ENV_TRANSLATE_TARGET: &str = "DISCOVERY_TRANSLATE_TARGET";

pub const DEFAULT_LIBRETRANSLATE_URL: &str = "http://localhost:65000";
pub const DEFAULT_DATABASE_PATH: &str = "discovery.db";

/// The video catalog rejects `maxResults` above this.
const MAX_SEARCH_RESULTS: u32 = 50;
/// The secondary catalog rejects `limit` above this.
const MAX_CATALOG_LIMIT: u32 = 200;

/// Video catalog search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Number of videos requested per search
    pub max_results: u32,
    /// Preferred result language (`relevanceLanguage`); empty disables it
    pub relevance_language: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 12,
            relevance_language: "ja".to_string(),
        }
    }
}

/// Secondary catalog (store) lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Storefront country code
    pub country: String,
    /// Number of tracks requested per lookup
    pub limit: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            country: "JP".to_string(),
            limit: 3,
        }
    }
}

/// Translation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSettings {
    /// Source language, `auto` lets the service detect it
    pub source: String,
    /// Target language used when the caller does not name one
    pub target: String,
    /// Upper bound on the characters sent in one request
    pub max_chunk_chars: usize,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            source: "auto".to_string(),
            target: "ja".to_string(),
            max_chunk_chars: 800,
        }
    }
}

/// Per-request timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutSettings {
    /// Catalog, details and lyrics requests
    pub request: Duration,
    /// Each translation chunk
    pub translate: Duration,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(6),
            translate: Duration::from_secs(10),
        }
    }
}

/// Configuration for the discovery core.
///
/// Use [`DiscoveryConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct DiscoveryConfig {
    /// Path to the SQLite database holding playlists
    pub database_path: PathBuf,

    /// HTTP client shared by every upstream client
    pub http_client: Arc<dyn HttpClient>,

    /// Video catalog API key; search and details are unavailable without it
    pub youtube_api_key: Option<String>,

    /// Base URL of the translation service
    pub libretranslate_url: String,

    pub search: SearchSettings,
    pub catalog: CatalogSettings,
    pub translation: TranslationSettings,
    pub timeouts: TimeoutSettings,
}

impl std::fmt::Debug for DiscoveryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryConfig")
            .field("database_path", &self.database_path)
            .field("http_client", &"HttpClient { ... }")
            .field(
                "youtube_api_key",
                &self
                    .youtube_api_key
                    .as_deref()
                    .map(|key| redact_if_sensitive("api_key", key)),
            )
            .field("libretranslate_url", &self.libretranslate_url)
            .field("search", &self.search)
            .field("catalog", &self.catalog)
            .field("translation", &self.translation)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl DiscoveryConfig {
    /// Creates a new builder for constructing a `DiscoveryConfig`.
    pub fn builder() -> DiscoveryConfigBuilder {
        DiscoveryConfigBuilder::default()
    }

    /// Builds a configuration from the process environment.
    ///
    /// Blank variables are treated as unset.
    pub fn from_env() -> Result<Self> {
        DiscoveryConfigBuilder::from_lookup(|key| std::env::var(key).ok())?.build()
    }

    /// Whether video search and details can be served.
    pub fn has_youtube(&self) -> bool {
        self.youtube_api_key.is_some()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - The API key, when present, is not blank
    /// - The translation endpoint is an http(s) URL
    /// - Limits are within what the upstream services accept
    /// - Timeouts are non-zero
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        if matches!(&self.youtube_api_key, Some(key) if key.trim().is_empty()) {
            return Err(Error::Config("YouTube API key cannot be blank".to_string()));
        }

        if !(self.libretranslate_url.starts_with("http://")
            || self.libretranslate_url.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "Translation endpoint must be an http(s) URL, got '{}'",
                self.libretranslate_url
            )));
        }

        if self.search.max_results == 0 || self.search.max_results > MAX_SEARCH_RESULTS {
            return Err(Error::Config(format!(
                "Search max_results must be between 1 and {}",
                MAX_SEARCH_RESULTS
            )));
        }

        if self.catalog.limit == 0 || self.catalog.limit > MAX_CATALOG_LIMIT {
            return Err(Error::Config(format!(
                "Catalog limit must be between 1 and {}",
                MAX_CATALOG_LIMIT
            )));
        }

        if self.catalog.country.trim().is_empty() {
            return Err(Error::Config("Catalog country cannot be empty".to_string()));
        }

        if self.translation.max_chunk_chars == 0 {
            return Err(Error::Config(
                "Translation chunk size must be greater than 0".to_string(),
            ));
        }

        if self.translation.target.trim().is_empty() {
            return Err(Error::Config(
                "Translation target language cannot be empty".to_string(),
            ));
        }

        if self.timeouts.request.is_zero() || self.timeouts.translate.is_zero() {
            return Err(Error::Config("Timeouts must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeouts: &TimeoutSettings) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeouts.request)
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeouts: &TimeoutSettings) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for upstream requests. \
                 Desktop: enable the 'desktop-shims' feature to use the default ReqwestHttpClient. \
                 Tests: inject a mock implementation."
            .to_string(),
    })
}

/// Builder for constructing [`DiscoveryConfig`] instances.
#[derive(Default)]
pub struct DiscoveryConfigBuilder {
    database_path: Option<PathBuf>,
    http_client: Option<Arc<dyn HttpClient>>,
    youtube_api_key: Option<String>,
    libretranslate_url: Option<String>,
    search: SearchSettings,
    catalog: CatalogSettings,
    translation: TranslationSettings,
    timeouts: TimeoutSettings,
}

impl DiscoveryConfigBuilder {
    /// Seeds a builder from a variable lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut builder = Self::default();

        if let Some(key) = read(ENV_YOUTUBE_API_KEY) {
            builder = builder.youtube_api_key(key);
        }
        if let Some(url) = read(ENV_LIBRETRANSLATE_URL) {
            builder = builder.libretranslate_url(url);
        }
        if let Some(path) = read(ENV_DATABASE_PATH) {
            builder = builder.database_path(path);
        }
        if let Some(raw) = read(ENV_MAX_RESULTS) {
            let max_results = raw.parse::<u32>().map_err(|e| Error::InvalidEnv {
                key: ENV_MAX_RESULTS.to_string(),
                message: e.to_string(),
            })?;
            builder = builder.max_results(max_results);
        }
        if let Some(country) = read(ENV_COUNTRY) {
            builder = builder.catalog_country(country);
        }
        if let Some(target) = read(ENV_TRANSLATE_TARGET) {
            builder = builder.translation_target(target);
        }

        Ok(builder)
    }

    /// Sets the database path (default `discovery.db`).
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn youtube_api_key(mut self, key: impl Into<String>) -> Self {
        self.youtube_api_key = Some(key.into());
        self
    }

    /// Sets the translation service base URL. A trailing slash is dropped.
    pub fn libretranslate_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.libretranslate_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.search.max_results = max_results;
        self
    }

    pub fn relevance_language(mut self, language: impl Into<String>) -> Self {
        self.search.relevance_language = language.into();
        self
    }

    pub fn catalog_country(mut self, country: impl Into<String>) -> Self {
        self.catalog.country = country.into();
        self
    }

    pub fn catalog_limit(mut self, limit: u32) -> Self {
        self.catalog.limit = limit;
        self
    }

    pub fn translation_target(mut self, target: impl Into<String>) -> Self {
        self.translation.target = target.into();
        self
    }

    pub fn translation_chunk_chars(mut self, max_chars: usize) -> Self {
        self.translation.max_chunk_chars = max_chars;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request = timeout;
        self
    }

    pub fn translate_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.translate = timeout;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityMissing`] when no HTTP client is available
    /// and [`Error::Config`] when a setting is out of range.
    pub fn build(self) -> Result<DiscoveryConfig> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(&self.timeouts)?,
        };

        let config = DiscoveryConfig {
            database_path: self
                .database_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            http_client,
            youtube_api_key: self.youtube_api_key,
            libretranslate_url: self
                .libretranslate_url
                .unwrap_or_else(|| DEFAULT_LIBRETRANSLATE_URL.to_string()),
            search: self.search,
            catalog: self.catalog,
            translation: self.translation,
            timeouts: self.timeouts,
        };

        config.validate()?;
        Ok(config)
    }
}
