//! Asset store subsystem.
//!
//! # Data Flow
//! ```text
//! Edge router (rewritten asset URI)
//!     → store.rs (AssetStore capability, FetchOutcome)
//!     → directory.rs (local build output)  or  upstream.rs (HTTP origin)
//!     → AssetResponse (status, headers, streamed body)
//!
//! Offline tooling:
//!     audio tree → manifest.rs → audio_manifest.json (served as an asset)
//! ```
//!
//! # Design Decisions
//! - The router sees only the trait; backends are chosen once at startup
//! - Stores never decorate responses; header policy belongs to the router

pub mod directory;
pub mod manifest;
pub mod store;
pub mod upstream;

use std::sync::Arc;

use axum::http::Uri;

use crate::config::{AssetSourceConfig, EdgeConfig};

pub use directory::DirectoryStore;
pub use store::{AssetResponse, AssetStore, FetchOutcome, StoreError};
pub use upstream::UpstreamStore;

/// Build the store selected by `config.assets`.
pub fn from_config(config: &EdgeConfig) -> Result<Arc<dyn AssetStore>, StoreError> {
    match &config.assets {
        AssetSourceConfig::Directory { root, index } => {
            let store = DirectoryStore::new(root.clone(), index.clone());
            tracing::info!(root = %store.root().display(), index = %index, "Serving assets from directory");
            Ok(Arc::new(store))
        }
        AssetSourceConfig::Upstream { url } => {
            let origin: Uri = url
                .parse()
                .map_err(|_| StoreError::InvalidOrigin(url.clone()))?;
            tracing::info!(origin = %origin, "Serving assets from upstream");
            Ok(Arc::new(UpstreamStore::new(&origin, &config.timeouts)?))
        }
    }
}
