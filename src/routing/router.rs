//! Edge asset router.
//!
//! # Responsibilities
//! - Gate requests on the base path
//! - Rewrite the path into the asset namespace and fetch it
//! - Decorate hits, fall back to the SPA shell on a miss
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - At most two sequential store calls per request, no retries
//! - Store errors and non-200 answers are both treated as a miss

use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::uri::{Authority, Scheme};
use axum::http::{header, Response, Uri};

use crate::assets::store::{AssetStore, FetchOutcome};
use crate::http::response::{asset_response, fallback_response, not_found};
use crate::routing::matcher::{AssetPath, BasePath};

/// Terminal state reached for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Path outside the base path; the store was not consulted.
    Rejected,
    /// Asset served with its class policy.
    Hit,
    /// SPA entry document served in place of a missing asset.
    Fallback,
    /// Neither the asset nor the entry document could be fetched.
    NotFound,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::Hit => "hit",
            Self::Fallback => "fallback",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes requests under a base path to an [`AssetStore`].
#[derive(Clone)]
pub struct EdgeRouter {
    base_path: BasePath,
    store: Arc<dyn AssetStore>,
}

impl EdgeRouter {
    pub fn new(base_path: BasePath, store: Arc<dyn AssetStore>) -> Self {
        Self { base_path, store }
    }

    pub fn base_path(&self) -> &BasePath {
        &self.base_path
    }

    /// Answer a request. Always produces exactly one response.
    pub async fn handle(&self, request: &Parts) -> Response<Body> {
        self.route(request).await.1
    }

    /// Answer a request and report which terminal state produced the response.
    pub async fn route(&self, request: &Parts) -> (Outcome, Response<Body>) {
        let path = request.uri.path();
        let Some(asset_path) = self.base_path.strip(path) else {
            tracing::debug!(path = %path, base_path = %self.base_path, "Request outside base path");
            return (Outcome::Rejected, not_found());
        };

        let origin = origin_of(request);
        let target = asset_path.with_query(request.uri.query());

        match FetchOutcome::fetch_at(self.store.as_ref(), origin.as_ref(), &target).await {
            FetchOutcome::Hit(hit) => {
                tracing::debug!(asset = %asset_path, "Asset hit");
                return (Outcome::Hit, asset_response(hit, &asset_path));
            }
            FetchOutcome::Miss(status) => {
                tracing::debug!(asset = %asset_path, status = %status, "Asset miss");
            }
            FetchOutcome::FetchError(e) => {
                tracing::error!(asset = %asset_path, error = %e, "Error fetching asset");
            }
        }

        let root = AssetPath::root();
        match FetchOutcome::fetch_at(self.store.as_ref(), origin.as_ref(), root.as_str()).await {
            FetchOutcome::Hit(index) => {
                tracing::debug!(asset = %asset_path, "Serving SPA fallback");
                (Outcome::Fallback, fallback_response(index))
            }
            FetchOutcome::Miss(status) => {
                tracing::warn!(asset = %asset_path, status = %status, "Entry document unavailable");
                (Outcome::NotFound, not_found())
            }
            FetchOutcome::FetchError(e) => {
                tracing::error!(asset = %asset_path, error = %e, "Error fetching entry document");
                (Outcome::NotFound, not_found())
            }
        }
    }
}

/// Scheme and authority of the inbound request, from its URI or Host header.
pub(crate) fn origin_of(request: &Parts) -> Option<(Scheme, Authority)> {
    if let Some(authority) = request.uri.authority() {
        let scheme = request.uri.scheme().cloned().unwrap_or(Scheme::HTTP);
        return Some((scheme, authority.clone()));
    }
    request
        .headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.parse::<Authority>().ok())
        .map(|authority| (Scheme::HTTP, authority))
}

/// Build the store URI for `path_and_query` on `origin`.
///
/// The origin is set explicitly so a path such as `//other.host/x` can
/// never move the fetch to another authority.
pub(crate) fn asset_uri(
    origin: Option<&(Scheme, Authority)>,
    path_and_query: &str,
) -> Result<Uri, axum::http::Error> {
    let mut builder = Uri::builder();
    if let Some((scheme, authority)) = origin {
        builder = builder.scheme(scheme.clone()).authority(authority.clone());
    }
    builder.path_and_query(path_and_query).build()
}

impl FetchOutcome {
    async fn fetch_at(
        store: &dyn AssetStore,
        origin: Option<&(Scheme, Authority)>,
        path_and_query: &str,
    ) -> Self {
        match asset_uri(origin, path_and_query) {
            Ok(uri) => Self::fetch(store, &uri).await,
            Err(e) => Self::FetchError(e.into()),
        }
    }
}
