//! Workspace umbrella crate.
//!
//! Exposes feature flags that map to the individual workspace crates so host
//! applications can depend on `discovery-workspace` alone. `desktop-shims`
//! pulls in the full [`core_service`] façade with the reqwest-backed HTTP
//! bridge; `reconcile` exposes only the pure metadata reconciliation engine.

#[cfg(feature = "desktop-shims")]
pub use core_service;

#[cfg(feature = "reconcile")]
pub use core_metadata;
