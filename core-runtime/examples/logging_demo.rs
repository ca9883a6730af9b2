//! Logging system demonstration
//!
//! Run with:
//! ```bash
//! cargo run -p core-runtime --example logging_demo
//! cargo run -p core-runtime --example logging_demo -- json
//! cargo run -p core-runtime --example logging_demo -- compact "core_metadata=trace"
//! ```

use bridge_traits::log::{ConsoleLogger, LogLevel};
use core_runtime::logging::{
    init_logging, redact_if_sensitive, strip_path, LogFormat, LoggingConfig,
};
use std::env;
use std::sync::Arc;
use tracing::{debug, info, info_span, instrument, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some(_) => LogFormat::Pretty,
        None => LogFormat::default(),
    };

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_logger_sink(Arc::new(ConsoleLogger {
            min_level: LogLevel::Warn,
        }));

    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }

    init_logging(config)?;

    info!(format = ?format, "Logging initialized");

    let api_key = env::var("YOUTUBE_API_KEY").unwrap_or_else(|_| "unset".to_string());
    info!(
        api_key = %redact_if_sensitive("api_key", &api_key),
        database = %strip_path("/var/lib/discovery/discovery.db"),
        "Configuration loaded"
    );

    resolve_lyrics(&[("Artist Name", "Song Title"), ("Song Title", "Artist Name")]).await;

    Ok(())
}

#[instrument(skip(candidates), fields(count = candidates.len()))]
async fn resolve_lyrics(candidates: &[(&str, &str)]) {
    for (index, (artist, title)) in candidates.iter().enumerate() {
        let span = info_span!("attempt", index);
        let _enter = span.enter();

        debug!(artist, title, "Trying candidate");
        if index == 0 {
            warn!(artist, title, "Lyrics not found");
            continue;
        }
        info!(artist, title, "Lyrics found");
        return;
    }
}
