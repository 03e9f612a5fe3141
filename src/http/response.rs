//! Response classification and cache/CORS decoration.
//!
//! # Responsibilities
//! - Classify an asset by its path
//! - Map each class to a cache directive and optional CORS headers
//! - Build the SPA fallback and not-found responses
//!
//! # Design Decisions
//! - Classification looks at the path suffix only, never at the
//!   Content-Type the store reports
//! - First matching rule wins; the immutable prefix is checked first
//! - Unclassified assets keep whatever Cache-Control the store sent

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::routing::matcher::AssetPath;
use crate::security::apply_security_headers;

/// Prefix of hashed build output.
pub const IMMUTABLE_PREFIX: &str = "/assets/";

/// Audio container extensions (with CORS for cross-origin playback).
pub const AUDIO_EXTENSIONS: [&str; 2] = ["mp3", "wav"];

/// Structured data extensions.
pub const DATA_EXTENSIONS: [&str; 1] = ["json"];

pub const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";
pub const CACHE_ONE_DAY: &str = "public, max-age=86400";
pub const CACHE_REVALIDATE: &str = "public, max-age=0, must-revalidate";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Asset category derived from the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Under [`IMMUTABLE_PREFIX`].
    Immutable,
    /// Ends in an audio extension.
    Audio,
    /// Ends in a structured-data extension.
    Data,
    /// Anything else.
    Other,
}

impl AssetClass {
    pub fn classify(path: &AssetPath) -> Self {
        let path = path.as_str();
        if path.starts_with(IMMUTABLE_PREFIX) {
            return Self::Immutable;
        }
        match extension(path) {
            Some(ext) if AUDIO_EXTENSIONS.contains(&ext) => Self::Audio,
            Some(ext) if DATA_EXTENSIONS.contains(&ext) => Self::Data,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immutable => "immutable",
            Self::Audio => "audio",
            Self::Data => "data",
            Self::Other => "other",
        }
    }
}

/// Case-sensitive extension of the final path segment.
fn extension(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    Some(ext)
}

/// Header mutations for an asset hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderPolicy {
    pub class: AssetClass,
    pub cache_control: Option<&'static str>,
    pub cors: bool,
}

impl HeaderPolicy {
    pub fn for_asset(path: &AssetPath) -> Self {
        let class = AssetClass::classify(path);
        let (cache_control, cors) = match class {
            AssetClass::Immutable => (Some(CACHE_IMMUTABLE), false),
            AssetClass::Audio => (Some(CACHE_ONE_DAY), true),
            AssetClass::Data => (Some(CACHE_ONE_DAY), false),
            AssetClass::Other => (None, false),
        };
        Self {
            class,
            cache_control,
            cors,
        }
    }

    pub fn apply(&self, headers: &mut HeaderMap) {
        if let Some(cache_control) = self.cache_control {
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));
        }
        if self.cors {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET, HEAD, OPTIONS"),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Range"),
            );
        }
    }
}

/// Decorate a store hit: keep status, headers and streamed body.
pub fn asset_response(hit: Response<Body>, path: &AssetPath) -> Response<Body> {
    let (mut parts, body) = hit.into_parts();
    HeaderPolicy::for_asset(path).apply(&mut parts.headers);
    apply_security_headers(&mut parts.headers);
    Response::from_parts(parts, body)
}

/// Re-wrap the entry document as the SPA shell.
///
/// The store's headers are dropped; only the fixed HTML headers and the
/// security set are sent.
pub fn fallback_response(index: Response<Body>) -> Response<Body> {
    let mut response = Response::new(index.into_body());
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_REVALIDATE));
    apply_security_headers(headers);
    response
}

/// Terminal 404 used by the gate and by a double miss.
pub fn not_found() -> Response<Body> {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
