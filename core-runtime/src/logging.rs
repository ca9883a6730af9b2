//! # Logging & Tracing Infrastructure
//!
//! Installs the global `tracing` subscriber for a discovery host:
//! - pretty, JSON or compact output on stdout
//! - workspace crates at the configured level, HTTP and database internals at `warn`
//! - optional mirroring of every event to a host [`LoggerSink`]
//!
//! ```ignore
//! use bridge_traits::log::{ConsoleLogger, LogLevel};
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//! use std::sync::Arc;
//!
//! init_logging(
//!     LoggingConfig::default()
//!         .with_format(LogFormat::Compact)
//!         .with_level(LogLevel::Debug)
//!         .with_logger_sink(Arc::new(ConsoleLogger::default())),
//! )?;
//! tracing::info!(query = "yoasobi", "Search started");
//! ```
//!
//! The video catalog key travels in request URLs. Values that reach the sink
//! go through [`redact_if_sensitive`], which hides credential fields, bare
//! API keys and `key=` query parameters.

use crate::error::{Error, Result};

use bridge_traits::log::{LogEntry, LogLevel, LoggerSink};

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{
    filter::EnvFilter,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

const REDACTED: &str = "[REDACTED]";

/// Crates whose events follow the configured base level.
const WORKSPACE_TARGETS: &[&str] = &[
    "discovery_workspace",
    "core_runtime",
    "core_metadata",
    "core_library",
    "core_service",
    "bridge_desktop",
];

/// Dependencies that are only interesting when something goes wrong.
const QUIET_TARGETS: &[&str] = &["h2", "hyper", "hyper_util", "reqwest", "rustls", "sqlx"];

/// Field names whose values are never shown.
const SECRET_FIELDS: &[&str] = &[
    "api_key",
    "apikey",
    "token",
    "secret",
    "password",
    "authorization",
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored; the debug build default
    Pretty,
    /// One JSON object per event; the release build default
    Json,
    /// One line per event
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Logging configuration
#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level applied to the workspace crates
    pub level: LogLevel,
    /// Replaces the default per-crate filter, e.g. `"core_metadata=trace"`
    pub filter: Option<String>,
    /// Host logger receiving a copy of every event
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    /// Hide secrets in values forwarded to the sink
    pub redact_secrets: bool,
    /// Log span open/close in the pretty format and span context in JSON
    pub span_events: bool,
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("filter", &self.filter)
            .field("logger_sink", &self.logger_sink.as_ref().map(|_| "LoggerSink { ... }"))
            .field("redact_secrets", &self.redact_secrets)
            .field("span_events", &self.span_events)
            .finish()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            logger_sink: None,
            redact_secrets: true,
            span_events: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    pub fn with_redaction(mut self, redact: bool) -> Self {
        self.redact_secrets = redact;
        self
    }

    pub fn with_span_events(mut self, enable: bool) -> Self {
        self.span_events = enable;
        self
    }
}

/// Installs the global subscriber.
///
/// Fails when the filter does not parse or a subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let sink_layer = LoggerSinkLayer::new(config.logger_sink.clone(), config.redact_secrets);
    let registry = tracing_subscriber::registry().with(filter).with(sink_layer);
    let fmt = tracing_subscriber::fmt::layer().with_writer(io::stdout);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(fmt.pretty().with_span_events(if config.span_events {
                FmtSpan::ACTIVE
            } else {
                FmtSpan::NONE
            }))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt.json()
                    .flatten_event(true)
                    .with_current_span(config.span_events)
                    .with_span_list(false),
            )
            .try_init(),
        LogFormat::Compact => registry.with(fmt.compact()).try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directives = config
        .filter
        .clone()
        .unwrap_or_else(|| default_filter(config.level));

    EnvFilter::try_new(directives).map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

/// Our crates at the requested level, noisy dependencies at warn.
fn default_filter(level: LogLevel) -> String {
    WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level.as_str()))
        .chain(QUIET_TARGETS.iter().map(|target| format!("{}=warn", target)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Layer that forwards events to a `LoggerSink` implementation.
struct LoggerSinkLayer {
    sink: Option<Arc<dyn LoggerSink>>,
    redact: bool,
}

impl LoggerSinkLayer {
    fn new(sink: Option<Arc<dyn LoggerSink>>, redact: bool) -> Self {
        Self { sink, redact }
    }

    fn entry(&self, event: &Event<'_>, level: LogLevel, span: Option<&str>) -> LogEntry {
        let metadata = event.metadata();
        let mut visitor = SinkVisitor::default();
        event.record(&mut visitor);

        let message = visitor.message.unwrap_or_else(|| metadata.name().to_string());
        let mut entry = LogEntry::new(level, metadata.target(), message);

        for (key, value) in visitor.fields {
            let value = if self.redact {
                redact_if_sensitive(&key, &value)
            } else {
                value
            };
            entry = entry.with_field(key, value);
        }

        match span {
            Some(span) => entry.with_span_id(span),
            None => entry,
        }
    }
}

impl<S> Layer<S> for LoggerSinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        let level = to_log_level(*event.metadata().level());
        if level < sink.min_level() {
            return;
        }

        let span = ctx.lookup_current();
        let entry = self.entry(event, level, span.as_ref().map(|s| s.name()));
        let sink = Arc::clone(sink);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(err) = sink.log(entry).await {
                    eprintln!("LoggerSink error: {}", err);
                }
            });
            return;
        }

        // Outside a runtime the entry is delivered synchronously.
        match tokio::runtime::Builder::new_current_thread().build() {
            Ok(runtime) => {
                if let Err(err) = runtime.block_on(sink.log(entry)) {
                    eprintln!("LoggerSink error: {}", err);
                }
            }
            Err(err) => eprintln!("LoggerSink unavailable: {}", err),
        }
    }
}

#[derive(Default)]
struct SinkVisitor {
    message: Option<String>,
    fields: HashMap<String, String>,
}

impl Visit for SinkVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_debug(field, &format_args!("{}", value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let value = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

fn to_log_level(level: tracing::Level) -> LogLevel {
    match level {
        tracing::Level::TRACE => LogLevel::Trace,
        tracing::Level::DEBUG => LogLevel::Debug,
        tracing::Level::INFO => LogLevel::Info,
        tracing::Level::WARN => LogLevel::Warn,
        tracing::Level::ERROR => LogLevel::Error,
    }
}

/// Hides a value when its field name or its content looks like a credential.
///
/// Field names `key`, `api_key`, `token`, `secret`, `password` and
/// `authorization` (in any case, also as suffixes like `youtube_api_key`)
/// are replaced entirely. Any other value keeps its text, except that bare
/// Google API keys and `key=` query parameters inside it are masked.
///
/// ```
/// use core_runtime::logging::redact_if_sensitive;
///
/// assert_eq!(redact_if_sensitive("api_key", "AIzaSy123"), "[REDACTED]");
/// assert_eq!(
///     redact_if_sensitive("url", "https://example.com/search?q=a&key=AIzaSy123"),
///     "https://example.com/search?q=a&key=[REDACTED]"
/// );
/// assert_eq!(redact_if_sensitive("title", "Song"), "Song");
/// ```
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    let field = field_name.to_lowercase();
    if field == "key" || SECRET_FIELDS.iter().any(|secret| field.contains(secret)) {
        return REDACTED.to_string();
    }

    if value.starts_with("AIza") && !value.contains(char::is_whitespace) {
        return REDACTED.to_string();
    }

    redact_key_parameter(value)
}

/// Masks the value of every `key=` query parameter in `value`.
fn redact_key_parameter(value: &str) -> String {
    let Some((base, query)) = value.split_once('?') else {
        return value.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if name.eq_ignore_ascii_case("key") => format!("{}={}", name, REDACTED),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query)
}

/// Strip full file paths to basename only
///
/// ```ignore
/// info!(database = %strip_path("/home/me/.local/share/discovery.db"), "Opened");
/// // Logs: database="discovery.db"
/// ```
pub fn strip_path(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as SinkResult;
    use std::sync::Mutex;

    struct TestLoggerSink {
        entries: Mutex<Vec<LogEntry>>,
        min_level: LogLevel,
    }

    impl TestLoggerSink {
        fn new(min_level: LogLevel) -> Arc<Self> {
            Arc::new(Self {
                entries: Mutex::new(Vec::new()),
                min_level,
            })
        }
    }

    #[async_trait]
    impl LoggerSink for TestLoggerSink {
        async fn log(&self, entry: LogEntry) -> SinkResult<()> {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }

        fn min_level(&self) -> LogLevel {
            self.min_level
        }
    }

    fn install(sink: &Arc<TestLoggerSink>, redact: bool) -> tracing::subscriber::DefaultGuard {
        let sink: Arc<dyn LoggerSink> = sink.clone();
        let subscriber =
            tracing_subscriber::registry().with(LoggerSinkLayer::new(Some(sink), redact));
        tracing::subscriber::set_default(subscriber)
    }

    #[test]
    fn test_key_parameter_is_masked() {
        assert_eq!(
            redact_if_sensitive(
                "url",
                "https://www.googleapis.com/youtube/v3/videos?id=v1&key=abc"
            ),
            "https://www.googleapis.com/youtube/v3/videos?id=v1&key=[REDACTED]"
        );
        assert_eq!(
            redact_if_sensitive("url", "https://api.lyrics.ovh/v1/Artist/Song"),
            "https://api.lyrics.ovh/v1/Artist/Song"
        );
        assert_eq!(
            redact_if_sensitive("url", "https://x.test/?monkey=1"),
            "https://x.test/?monkey=1"
        );
    }

    #[test]
    fn test_bare_api_key_value_is_masked() {
        assert_eq!(redact_if_sensitive("value", "AIzaSyABCDEF"), REDACTED);
        assert_eq!(redact_if_sensitive("title", "AIza is a word here"), "AIza is a word here");
    }

    #[test]
    fn test_default_filter_lists_workspace_crates() {
        let filter = default_filter(LogLevel::Debug);

        assert!(filter.contains("core_metadata=debug"));
        assert!(filter.contains("core_service=debug"));
        assert!(filter.contains("reqwest=warn"));
        assert!(build_filter(&LoggingConfig::default().with_level(LogLevel::Debug)).is_ok());
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let config = LoggingConfig::default().with_filter("core_metadata=loud");
        assert!(matches!(build_filter(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_sink_receives_redacted_event() {
        let sink = TestLoggerSink::new(LogLevel::Trace);
        let _guard = install(&sink, true);

        tracing::info!(
            target: "core_metadata::lyrics",
            source = "parsed_title",
            attempt = 2,
            api_key = "AIzaSy123",
            "Lyrics found"
        );

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.target, "core_metadata::lyrics");
        assert_eq!(entry.message, "Lyrics found");
        assert_eq!(entry.fields.get("source").map(String::as_str), Some("parsed_title"));
        assert_eq!(entry.fields.get("attempt").map(String::as_str), Some("2"));
        assert_eq!(entry.fields.get("api_key").map(String::as_str), Some(REDACTED));
    }

    #[test]
    fn test_sink_without_redaction_keeps_values() {
        let sink = TestLoggerSink::new(LogLevel::Trace);
        let _guard = install(&sink, false);

        tracing::warn!(api_key = "AIzaSy123", "Configured");

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries[0].fields.get("api_key").map(String::as_str), Some("AIzaSy123"));
    }

    #[test]
    fn test_sink_respects_min_level() {
        let sink = TestLoggerSink::new(LogLevel::Warn);
        let _guard = install(&sink, true);

        tracing::info!("dropped");
        tracing::warn!("kept");

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "kept");
    }
}
