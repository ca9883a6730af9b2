//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the discovery core:
//! - Logging and tracing infrastructure
//! - Configuration management (API keys, upstream endpoints, limits, timeouts)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other modules depend on.
//! It establishes the logging conventions and the configuration object the
//! service façade is built from.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{DiscoveryConfig, DiscoveryConfigBuilder};
pub use error::{Error, Result};
