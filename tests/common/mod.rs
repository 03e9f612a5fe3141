//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{Request, Response, StatusCode, Uri};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use minimal_pairs_edge::assets::{AssetResponse, AssetStore, StoreError};
use minimal_pairs_edge::routing::{BasePath, EdgeRouter};

pub const BASE: &str = "/language-learning/minimal-pairs";

#[derive(Clone)]
struct Entry {
    status: StatusCode,
    headers: Vec<(&'static str, &'static str)>,
    body: &'static [u8],
}

/// Deterministic in-memory store that records every fetched URI.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, Entry>,
    failing: HashSet<String>,
    calls: Mutex<Vec<Uri>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 at `path`.
    pub fn with_asset(self, path: &str, body: &'static [u8]) -> Self {
        self.with_response(path, StatusCode::OK, &[], body)
    }

    pub fn with_response(
        mut self,
        path: &str,
        status: StatusCode,
        headers: &[(&'static str, &'static str)],
        body: &'static [u8],
    ) -> Self {
        self.entries.insert(
            path.to_string(),
            Entry {
                status,
                headers: headers.to_vec(),
                body,
            },
        );
        self
    }

    /// Make fetches of `path` fail with an I/O error.
    pub fn failing_at(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn into_router(self, base_path: &str) -> (Arc<Self>, EdgeRouter) {
        let store = Arc::new(self);
        let router = EdgeRouter::new(BasePath::parse(base_path).unwrap(), store.clone());
        (store, router)
    }

    pub fn calls(&self) -> Vec<Uri> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn fetch(&self, uri: &Uri) -> Result<AssetResponse, StoreError> {
        self.calls.lock().unwrap().push(uri.clone());

        let path = uri.path();
        if self.failing.contains(path) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "store unavailable",
            )));
        }

        let Some(entry) = self.entries.get(path) else {
            let mut response = Response::new(Body::from("missing"));
            *response.status_mut() = StatusCode::NOT_FOUND;
            return Ok(response);
        };

        let mut builder = Response::builder().status(entry.status);
        for (name, value) in &entry.headers {
            builder = builder.header(*name, *value);
        }
        Ok(builder.body(Body::from(entry.body))?)
    }
}

/// Request parts for a GET of `uri` with a Host header.
pub fn get(uri: &str) -> Parts {
    Request::get(uri)
        .header("host", "drill.example.com")
        .body(())
        .unwrap()
        .into_parts()
        .0
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Start a programmable HTTP origin. `f` maps a request path to
/// `(status, content type, body)`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, &'static str, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]);
                        let path = head
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();

                        let (status, content_type, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            content_type,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
