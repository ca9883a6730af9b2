//! # Host Bridge Traits
//!
//! Capability traits the discovery core needs from its host.
//!
//! ## Overview
//!
//! The core never opens sockets or writes to a console directly. Every
//! outbound request goes through [`HttpClient`](http::HttpClient) and every
//! mirrored log line goes through [`LoggerSink`](log::LoggerSink), so hosts
//! (desktop binary, server, tests) decide how those capabilities are
//! provided.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP with retry policy support
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! | Host     | Implementation Crate |
//! |----------|----------------------|
//! | Desktop  | `bridge-desktop`     |
//! | Tests    | `mockall` doubles    |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! convert transport-specific failures (timeouts, refused connections,
//! malformed bodies) into it with an actionable message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single client can be shared
//! by every provider through an `Arc`.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod log;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
