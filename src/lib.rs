//! Edge asset router for the minimal-pairs pronunciation drill.
//!
//! Serves the drill's static build under a fixed base path, applies cache,
//! CORS and security headers by asset class, and falls back to the
//! single-page-app shell for unmatched paths.

pub mod assets;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use assets::{AssetStore, DirectoryStore, FetchOutcome, StoreError, UpstreamStore};
pub use config::EdgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{BasePath, EdgeRouter, Outcome};
