//! End-to-end tests through the HTTP host.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode, Uri};
use tower::ServiceExt;

use minimal_pairs_edge::assets::{AssetResponse, AssetStore, StoreError};
use minimal_pairs_edge::config::{AssetSourceConfig, EdgeConfig};
use minimal_pairs_edge::http::{HttpServer, X_REQUEST_ID};
use minimal_pairs_edge::lifecycle::{startup, Shutdown};
use minimal_pairs_edge::routing::{BasePath, EdgeRouter};

mod common;
use common::BASE;

fn write_site(root: &Path) {
    std::fs::write(root.join("index.html"), "<html>shell</html>").unwrap();
    std::fs::create_dir_all(root.join("assets")).unwrap();
    std::fs::write(root.join("assets/index.9c1d.js"), "bundle").unwrap();
    std::fs::create_dir_all(root.join("audio/bn-IN/kal")).unwrap();
    std::fs::write(root.join("audio/bn-IN/kal/kal_anika.mp3"), b"ID3data").unwrap();
}

fn directory_config(root: &Path) -> EdgeConfig {
    let mut config = EdgeConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.assets = AssetSourceConfig::Directory {
        root: root.to_path_buf(),
        index: "index.html".into(),
    };
    config
}

async fn spawn_server(config: EdgeConfig) -> (SocketAddr, Shutdown) {
    let edge = startup::build_router(&config).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, edge);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn serves_directory_over_http() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    let (addr, shutdown) = spawn_server(directory_config(dir.path())).await;
    let client = client();

    let audio = client
        .get(format!("http://{addr}{BASE}/audio/bn-IN/kal/kal_anika.mp3"))
        .send()
        .await
        .expect("edge unreachable");
    assert_eq!(audio.status(), 200);
    assert_eq!(audio.headers()["content-type"], "audio/mpeg");
    assert_eq!(audio.headers()["cache-control"], "public, max-age=86400");
    assert_eq!(audio.headers()["access-control-allow-origin"], "*");
    assert_eq!(audio.headers()["x-frame-options"], "DENY");
    assert!(audio.headers().contains_key("x-request-id"));
    assert_eq!(audio.bytes().await.unwrap().as_ref(), b"ID3data");

    let bundle = client
        .get(format!("http://{addr}{BASE}/assets/index.9c1d.js"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        bundle.headers()["cache-control"],
        "public, max-age=31536000, immutable"
    );

    let spa = client
        .get(format!("http://{addr}{BASE}/practice/bn-IN"))
        .send()
        .await
        .unwrap();
    assert_eq!(spa.status(), 200);
    assert_eq!(spa.headers()["content-type"], "text/html; charset=utf-8");
    assert_eq!(spa.headers()["cache-control"], "public, max-age=0, must-revalidate");
    assert_eq!(spa.text().await.unwrap(), "<html>shell</html>");

    let outside = client
        .get(format!("http://{addr}/somewhere-else"))
        .send()
        .await
        .unwrap();
    assert_eq!(outside.status(), 404);
    assert!(!outside.headers().contains_key("x-frame-options"));

    shutdown.trigger();
}

#[tokio::test]
async fn missing_entry_document_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = spawn_server(directory_config(dir.path())).await;

    let res = client()
        .get(format!("http://{addr}{BASE}/anything"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert!(!res.headers().contains_key("content-security-policy"));

    shutdown.trigger();
}

#[tokio::test]
async fn keeps_client_request_id() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    let app = HttpServer::new(
        directory_config(dir.path()),
        startup::build_router(&directory_config(dir.path())).unwrap(),
    )
    .into_router();

    let response = app
        .oneshot(
            Request::get(format!("{BASE}/"))
                .header(X_REQUEST_ID, "trace-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[X_REQUEST_ID], "trace-42");
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
}

/// Store that never answers within the host timeout.
struct StalledStore;

#[async_trait]
impl AssetStore for StalledStore {
    async fn fetch(&self, _uri: &Uri) -> Result<AssetResponse, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(StoreError::Timeout(Duration::from_secs(30)))
    }
}

#[tokio::test]
async fn host_timeout_keeps_request_id() {
    let mut config = EdgeConfig::default();
    config.timeouts.request_secs = 1;
    let edge = EdgeRouter::new(BasePath::parse(BASE).unwrap(), Arc::new(StalledStore));
    let app = HttpServer::new(config, edge).into_router();

    let response = app
        .oneshot(
            Request::get(format!("{BASE}/audio/kal.mp3"))
                .header(X_REQUEST_ID, "slow-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.headers()[X_REQUEST_ID], "slow-1");
}

#[tokio::test]
async fn head_request_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    let (addr, shutdown) = spawn_server(directory_config(dir.path())).await;

    let res = client()
        .head(format!("http://{addr}{BASE}/audio/bn-IN/kal/kal_anika.mp3"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["access-control-allow-headers"], "Range");

    shutdown.trigger();
}

#[tokio::test]
async fn upstream_store_round_trip() {
    let hits = Arc::new(AtomicU32::new(0));
    let h = hits.clone();
    let origin = common::start_programmable_backend(move |path| {
        let h = h.clone();
        async move {
            h.fetch_add(1, Ordering::SeqCst);
            match path.as_str() {
                "/" => (200, "text/html", "<html>origin shell</html>".to_string()),
                "/data/pairs.json?set=ka" => (200, "application/json", "[]".to_string()),
                _ => (404, "text/plain", "nope".to_string()),
            }
        }
    })
    .await;

    let mut config = EdgeConfig::default();
    config.assets = AssetSourceConfig::Upstream {
        url: format!("http://{origin}"),
    };
    let (addr, shutdown) = spawn_server(config).await;
    let client = client();

    let data = client
        .get(format!("http://{addr}{BASE}/data/pairs.json?set=ka"))
        .send()
        .await
        .unwrap();
    assert_eq!(data.status(), 200);
    assert_eq!(data.headers()["content-type"], "application/json");
    assert_eq!(data.headers()["cache-control"], "public, max-age=86400");
    assert_eq!(data.text().await.unwrap(), "[]");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let spa = client
        .get(format!("http://{addr}{BASE}/practice"))
        .send()
        .await
        .unwrap();
    assert_eq!(spa.status(), 200);
    assert_eq!(spa.text().await.unwrap(), "<html>origin shell</html>");
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    shutdown.trigger();
}

#[tokio::test]
async fn upstream_connection_headers_are_not_forwarded() {
    // The origin answers every request with `Connection: close`.
    let origin = common::start_programmable_backend(|_path| async move {
        (200, "application/json", "{}".to_string())
    })
    .await;

    let mut config = EdgeConfig::default();
    config.assets = AssetSourceConfig::Upstream {
        url: format!("http://{origin}"),
    };
    let edge = startup::build_router(&config).unwrap();
    let app = HttpServer::new(config, edge).into_router();

    let response = app
        .oneshot(
            Request::get(format!("{BASE}/x.json"))
                .header(header::HOST, "drill.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert!(!response.headers().contains_key(header::CONNECTION));
    assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=86400");
}
