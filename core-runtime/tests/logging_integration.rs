//! Integration tests for logging system

use bridge_traits::log::LogLevel;
use core_runtime::logging::{redact_if_sensitive, strip_path, LogFormat, LoggingConfig};

#[test]
fn test_logging_config_defaults() {
    let config = LoggingConfig::default();

    assert_eq!(config.level, LogLevel::Info);
    assert!(config.redact_secrets);
    assert!(config.span_events);
    assert!(config.filter.is_none());
    assert!(config.logger_sink.is_none());
}

#[test]
fn test_api_keys_are_redacted() {
    assert_eq!(redact_if_sensitive("api_key", "AIzaSy0123"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("youtube_api_key", "AIzaSy0123"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("Authorization", "Bearer abc"), "[REDACTED]");
}

#[test]
fn test_request_urls_hide_the_key() {
    let url = "https://www.googleapis.com/youtube/v3/search?part=snippet&q=yoasobi&key=AIzaSy0123";
    let redacted = redact_if_sensitive("url", url);

    assert!(redacted.ends_with("key=[REDACTED]"));
    assert!(redacted.contains("q=yoasobi"));
    assert!(!redacted.contains("AIzaSy0123"));
}

#[test]
fn test_track_fields_pass_through() {
    assert_eq!(redact_if_sensitive("video_id", "dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    assert_eq!(redact_if_sensitive("title", "夜に駆ける"), "夜に駆ける");
    assert_eq!(redact_if_sensitive("artist", "YOASOBI"), "YOASOBI");
}

#[test]
fn test_path_stripping() {
    assert_eq!(strip_path("/var/lib/discovery/discovery.db"), "discovery.db");
    assert_eq!(strip_path("D:\\data\\discovery.db"), "discovery.db");
    assert_eq!(strip_path("discovery.db"), "discovery.db");
    assert_eq!(strip_path(""), "");
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_redaction(false)
        .with_span_events(false)
        .with_filter("core_service=debug");

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.redact_secrets);
    assert!(!config.span_events);
    assert_eq!(config.filter.as_deref(), Some("core_service=debug"));
}
