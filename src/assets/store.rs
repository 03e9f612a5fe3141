//! Asset store capability consumed by the edge router.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Response, StatusCode, Uri};
use thiserror::Error;

/// Response produced by a store: status, headers and a streamed body.
pub type AssetResponse = Response<Body>;

/// Errors raised while fetching from a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error reading asset: {0}")]
    Io(#[from] std::io::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream origin '{0}' needs a scheme and authority")]
    InvalidOrigin(String),

    #[error("invalid asset request: {0}")]
    Http(#[from] axum::http::Error),
}

/// Read-only capability that resolves a URL to a stored asset.
///
/// Implementations own any timeout policy; the router never retries.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Fetch the asset at `uri`. Only the path and query identify the asset.
    async fn fetch(&self, uri: &Uri) -> Result<AssetResponse, StoreError>;
}

/// Result of one store fetch as seen by the router.
///
/// `Miss` and `FetchError` both advance to the SPA fallback; they are kept
/// apart so the cause can be logged.
pub enum FetchOutcome {
    Hit(AssetResponse),
    Miss(StatusCode),
    FetchError(StoreError),
}

impl FetchOutcome {
    /// Fetch `uri` from `store` and classify the result.
    pub async fn fetch(store: &dyn AssetStore, uri: &Uri) -> Self {
        Self::from(store.fetch(uri).await)
    }
}

impl From<Result<AssetResponse, StoreError>> for FetchOutcome {
    fn from(result: Result<AssetResponse, StoreError>) -> Self {
        match result {
            Ok(response) if response.status() == StatusCode::OK => Self::Hit(response),
            Ok(response) => Self::Miss(response.status()),
            Err(e) => Self::FetchError(e),
        }
    }
}
