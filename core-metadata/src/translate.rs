//! # Translation
//!
//! LibreTranslate client. Long texts are split on line boundaries into
//! chunks below the service's request size, translated one after the other
//! and joined back with newlines.

use crate::error::{MetadataError, Result};
use crate::providers::{parse_body, upstream_error};
use bridge_traits::http::{HttpClient, HttpRequest};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Chunk size used when none is configured
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 800;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n").expect("line break regex"));

/// Splits `text` into chunks of whole lines.
///
/// Lines are packed greedily while the chunk, newlines included, stays within
/// `max_chars` characters. A line longer than `max_chars` becomes a chunk of
/// its own. Trailing empty lines are dropped; text without any line yields a
/// single chunk holding the text unchanged.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<&str> = LINE_BREAK.split(text).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for line in lines {
        let line_chars = line.chars().count();
        let added = line_chars + usize::from(!current.is_empty());

        if current_len + added > max_chars && !current.is_empty() {
            chunks.push(current.join("\n"));
            current = vec![line];
            current_len = line_chars;
        } else {
            current.push(line);
            current_len += added;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}

/// A translated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    /// Source language reported for the first chunk, when `source` was `auto`
    pub detected_language: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetectedLanguage {
    Detailed { language: Option<String> },
    Code(String),
}

impl DetectedLanguage {
    fn into_code(self) -> Option<String> {
        match self {
            Self::Detailed { language } => language,
            Self::Code(code) => Some(code),
        }
        .filter(|code| !code.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    #[serde(default)]
    translated_text: Option<String>,
    #[serde(default)]
    detected_language: Option<DetectedLanguage>,
}

/// LibreTranslate client
pub struct LibreTranslateClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    max_chunk_chars: usize,
    timeout: Duration,
}

impl LibreTranslateClient {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Translates `text` from `source` (`"auto"` to detect) into `target`.
    ///
    /// The first failing chunk aborts the whole translation.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Result<Translation> {
        if text.trim().is_empty() {
            return Err(MetadataError::MissingInput("text"));
        }

        let chunks = split_text(text, self.max_chunk_chars);
        debug!(chunks = chunks.len(), "Translating text");

        let mut translated = Vec::with_capacity(chunks.len());
        let mut detected_language = None;

        for chunk in &chunks {
            let response = self.translate_chunk(chunk, source, target).await?;
            translated.push(response.translated_text.unwrap_or_default());

            if detected_language.is_none() {
                detected_language = response
                    .detected_language
                    .and_then(DetectedLanguage::into_code);
            }
        }

        Ok(Translation {
            text: translated.join("\n"),
            detected_language,
        })
    }

    async fn translate_chunk(
        &self,
        chunk: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslateResponse> {
        let url = format!("{}/translate", self.base_url);
        let request = HttpRequest::post(url.as_str())
            .json(&TranslateRequest {
                q: chunk,
                source,
                target,
                format: "text",
            })?
            .timeout(self.timeout);

        let response = self.http_client.execute(request).await.map_err(|e| {
            MetadataError::Http(format!("Translation service unreachable at {}: {}", url, e))
        })?;

        if !response.is_success() {
            return Err(upstream_error(&response, "LibreTranslate request failed"));
        }

        parse_body(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{json_response, MockHttpClient};
    use bridge_traits::error::BridgeError;
    use bridge_traits::http::HttpMethod;
    use mockall::Sequence;
    use serde_json::json;

    fn request_body(request: &HttpRequest) -> serde_json::Value {
        serde_json::from_slice(request.body.as_deref().unwrap_or_default()).unwrap()
    }

    #[test]
    fn test_split_short_text_is_one_chunk() {
        assert_eq!(split_text("one\ntwo", 800), vec!["one\ntwo"]);
    }

    #[test]
    fn test_split_packs_lines_greedily() {
        // "aaaa\nbbbb" is 9 chars, adding "\ncc" would make 12
        let chunks = split_text("aaaa\nbbbb\ncc\r\ndd", 10);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cc\ndd"]);
    }

    #[test]
    fn test_split_keeps_long_line_whole() {
        let chunks = split_text("short\nthis line is far too long\nend", 8);
        assert_eq!(chunks, vec!["short", "this line is far too long", "end"]);
    }

    #[test]
    fn test_split_counts_characters_not_bytes() {
        // six characters, eighteen bytes
        assert_eq!(split_text("夜に駆ける。\n群青", 9), vec!["夜に駆ける。\n群青"]);
    }

    #[test]
    fn test_split_without_lines_returns_text() {
        assert_eq!(split_text("", 10), vec![""]);
        assert_eq!(split_text("\n\n", 10), vec!["\n\n"]);
        assert_eq!(split_text("line\n\n", 10), vec!["line"]);
    }

    #[tokio::test]
    async fn test_translate_single_chunk() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| {
                let body = request_body(req);
                req.method == HttpMethod::Post
                    && req.url == "http://localhost:65000/translate"
                    && req.timeout == Some(Duration::from_secs(10))
                    && body["q"] == "Hello"
                    && body["source"] == "auto"
                    && body["target"] == "ja"
                    && body["format"] == "text"
            })
            .times(1)
            .returning(|_| {
                Ok(json_response(
                    200,
                    json!({
                        "translatedText": "こんにちは",
                        "detectedLanguage": { "confidence": 90.0, "language": "en" }
                    }),
                ))
            });

        let client = LibreTranslateClient::new(Arc::new(http), "http://localhost:65000/");
        let translation = client.translate("Hello", "auto", "ja").await.unwrap();

        assert_eq!(translation.text, "こんにちは");
        assert_eq!(translation.detected_language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_translate_joins_chunks_and_keeps_first_detection() {
        let mut http = MockHttpClient::new();
        let mut seq = Sequence::new();

        http.expect_execute()
            .withf(|req| request_body(req)["q"] == "aaaa")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(json_response(
                    200,
                    json!({ "translatedText": "AAAA", "detectedLanguage": "en" }),
                ))
            });
        http.expect_execute()
            .withf(|req| request_body(req)["q"] == "bbbb")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(json_response(
                    200,
                    json!({ "translatedText": "BBBB", "detectedLanguage": "fr" }),
                ))
            });

        let client =
            LibreTranslateClient::new(Arc::new(http), "http://lt.local").with_max_chunk_chars(5);
        let translation = client.translate("aaaa\nbbbb", "auto", "ja").await.unwrap();

        assert_eq!(translation.text, "AAAA\nBBBB");
        assert_eq!(translation.detected_language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_first_failing_chunk_aborts() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                400,
                json!({ "error": "xx is not supported" }),
            ))
        });

        let client =
            LibreTranslateClient::new(Arc::new(http), "http://lt.local").with_max_chunk_chars(5);
        let err = client.translate("aaaa\nbbbb", "auto", "xx").await.unwrap_err();

        assert_eq!(err.to_string(), "xx is not supported");
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .returning(|_| Err(BridgeError::OperationFailed("connection refused".to_string())));

        let client = LibreTranslateClient::new(Arc::new(http), "http://localhost:65000");
        let err = client.translate("Hello", "auto", "ja").await.unwrap_err();

        match err {
            MetadataError::Http(message) => {
                assert!(message.contains("http://localhost:65000/translate"));
                assert!(message.contains("connection refused"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_text_is_missing_input() {
        let mut http = MockHttpClient::new();
        http.expect_execute().never();

        let client = LibreTranslateClient::new(Arc::new(http), "http://localhost:65000");
        let err = client.translate(" \n ", "auto", "ja").await.unwrap_err();

        assert!(matches!(err, MetadataError::MissingInput("text")));
    }
}
