//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the asset source is usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::Uri;
use thiserror::Error;

use crate::config::schema::{AssetSourceConfig, EdgeConfig};
use crate::routing::matcher::{BasePath, BasePathError};

/// A single semantic problem with a configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("base_path: {0}")]
    BasePath(#[from] BasePathError),

    #[error("{field}: '{value}' is not a socket address")]
    Address { field: &'static str, value: String },

    #[error("assets.url: '{0}' must be an absolute http:// URL")]
    UpstreamUrl(String),

    #[error("assets.index: '{0}' must be a plain file name")]
    IndexDocument(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Check an [`EdgeConfig`] for semantic errors.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = BasePath::parse(&config.base_path) {
        errors.push(ValidationError::BasePath(e));
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    match &config.assets {
        AssetSourceConfig::Directory { index, .. } => {
            if index.is_empty() || index.contains('/') {
                errors.push(ValidationError::IndexDocument(index.clone()));
            }
        }
        AssetSourceConfig::Upstream { url } => {
            let valid = url
                .parse::<Uri>()
                .map(|uri| uri.scheme_str() == Some("http") && uri.authority().is_some())
                .unwrap_or(false);
            if !valid {
                errors.push(ValidationError::UpstreamUrl(url.clone()));
            }
        }
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("request_secs", timeouts.request_secs),
        ("upstream_connect_secs", timeouts.upstream_connect_secs),
        ("upstream_request_secs", timeouts.upstream_request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field,
            value: value.to_string(),
        });
    }
}
