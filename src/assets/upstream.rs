//! Asset store that forwards fetches to another HTTP origin.
//!
//! # Responsibilities
//! - Rewrite the asset URI onto the configured origin
//! - Issue a bodiless GET through a pooled client
//! - Enforce connect and request deadlines
//!
//! # Design Decisions
//! - Upstream status and end-to-end headers are returned untouched; the
//!   router decides what counts as a hit
//! - Hop-by-hop headers, and any header the origin lists in `Connection`,
//!   describe the upstream connection only and are dropped
//! - The deadline covers time to response headers, the body still streams

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{header, HeaderMap, HeaderName, Method, Request, Response, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::assets::store::{AssetResponse, AssetStore, StoreError};
use crate::config::TimeoutConfig;

/// Connection-scoped headers never forwarded to the client.
const HOP_BY_HOP: [HeaderName; 9] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers, including those named by `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

/// Forwards asset fetches to `origin`.
#[derive(Clone)]
pub struct UpstreamStore {
    client: Client<HttpConnector, Body>,
    scheme: Scheme,
    authority: Authority,
    request_timeout: Duration,
}

impl UpstreamStore {
    /// Build a store for `origin`, which must carry a scheme and authority.
    pub fn new(origin: &Uri, timeouts: &TimeoutConfig) -> Result<Self, StoreError> {
        let (scheme, authority) = match (origin.scheme(), origin.authority()) {
            (Some(s), Some(a)) => (s.clone(), a.clone()),
            _ => return Err(StoreError::InvalidOrigin(origin.to_string())),
        };

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.upstream_connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            scheme,
            authority,
            request_timeout: Duration::from_secs(timeouts.upstream_request_secs),
        })
    }

    /// Target URI on the upstream origin for an asset URI.
    pub fn target(&self, uri: &Uri) -> Result<Uri, StoreError> {
        let path_and_query = uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()?)
    }
}

#[async_trait]
impl AssetStore for UpstreamStore {
    async fn fetch(&self, uri: &Uri) -> Result<AssetResponse, StoreError> {
        let target = self.target(uri)?;
        let request = Request::builder()
            .method(Method::GET)
            .uri(target)
            .body(Body::empty())?;

        let response = tokio::time::timeout(self.request_timeout, self.client.request(request))
            .await
            .map_err(|_| StoreError::Timeout(self.request_timeout))??;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> UpstreamStore {
        UpstreamStore::new(
            &Uri::from_static("http://127.0.0.1:9000"),
            &TimeoutConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn target_keeps_path_and_query() {
        let target = store()
            .target(&Uri::from_static("https://edge.example.com/audio/x.mp3?v=2"))
            .unwrap();
        assert_eq!(target, "http://127.0.0.1:9000/audio/x.mp3?v=2");
    }

    #[test]
    fn target_for_path_only_uri() {
        let target = store().target(&Uri::from_static("/")).unwrap();
        assert_eq!(target, "http://127.0.0.1:9000/");
    }

    #[test]
    fn relative_origin_is_rejected() {
        let result = UpstreamStore::new(&Uri::from_static("/relative"), &TimeoutConfig::default());
        assert!(matches!(result, Err(StoreError::InvalidOrigin(_))));
    }

    #[test]
    fn drops_hop_by_hop_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "audio/mpeg".parse().unwrap());
        headers.insert(header::ETAG, "\"v1\"".parse().unwrap());
        headers.insert(header::CONNECTION, "close, X-Origin-Hop".parse().unwrap());
        headers.insert("x-origin-hop", "1".parse().unwrap());
        headers.insert("keep-alive", "timeout=5".parse().unwrap());
        headers.insert(header::TRANSFER_ENCODING, "chunked".parse().unwrap());
        headers.insert(header::UPGRADE, "h2c".parse().unwrap());
        headers.insert(header::PROXY_AUTHENTICATE, "Basic".parse().unwrap());

        strip_hop_by_hop(&mut headers);

        let mut left: Vec<_> = headers.keys().map(|k| k.as_str()).collect();
        left.sort();
        assert_eq!(left, ["content-type", "etag"]);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let origin: Uri = format!("http://{addr}").parse().unwrap();
        let store = UpstreamStore::new(&origin, &TimeoutConfig::default()).unwrap();

        let result = store.fetch(&Uri::from_static("/")).await;
        assert!(matches!(result, Err(StoreError::Upstream(_))));
    }
}
