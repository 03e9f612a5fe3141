//! Asset store backed by a local build output directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Response, StatusCode, Uri};
use percent_encoding::percent_decode_str;
use tokio::fs::{self, File};
use tokio_util::io::ReaderStream;

use crate::assets::store::{AssetResponse, AssetStore, StoreError};

/// Serves files below `root`, mapping "/" and directories to the index document.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    index: String,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>, index: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index: index.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a URI path to a filesystem path below the root.
    ///
    /// Returns `None` for undecodable paths and any `..` segment.
    fn resolve(&self, uri_path: &str) -> Option<PathBuf> {
        let decoded = percent_decode_str(uri_path).decode_utf8().ok()?;
        let mut path = self.root.clone();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return None,
                s if s.contains(['\\', '\0']) => return None,
                s => path.push(s),
            }
        }
        Some(path)
    }
}

fn is_missing(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

fn not_found() -> AssetResponse {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

#[async_trait]
impl AssetStore for DirectoryStore {
    async fn fetch(&self, uri: &Uri) -> Result<AssetResponse, StoreError> {
        let Some(mut path) = self.resolve(uri.path()) else {
            tracing::debug!(path = %uri.path(), "Rejected asset path");
            return Ok(not_found());
        };

        let mut metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if is_missing(&e) => return Ok(not_found()),
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            path.push(&self.index);
            metadata = match fs::metadata(&path).await {
                Ok(m) => m,
                Err(e) if is_missing(&e) => return Ok(not_found()),
                Err(e) => return Err(e.into()),
            };
        }

        if !metadata.is_file() {
            return Ok(not_found());
        }

        let file = match File::open(&path).await {
            Ok(f) => f,
            Err(e) if is_missing(&e) => return Ok(not_found()),
            Err(e) => return Err(e.into()),
        };

        let mime = mime_guess::from_path(&path).first_or_octet_stream();

        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime.as_ref())
            .header(header::CONTENT_LENGTH, metadata.len())
            .body(Body::from_stream(ReaderStream::new(file)))?;

        Ok(response)
    }
}
