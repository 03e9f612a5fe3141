//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration and apply command-line overrides
//! - Validate before anything is built
//! - Build the asset store and edge router
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Overrides are applied before validation so they are checked too

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::assets::{self, StoreError};
use crate::config::loader::{read_config, ConfigError};
use crate::config::validation::validate_config;
use crate::config::{AssetSourceConfig, EdgeConfig};
use crate::routing::{BasePath, BasePathError, EdgeRouter};

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid base path: {0}")]
    BasePath(#[from] BasePathError),

    #[error("failed to build asset store: {0}")]
    Store(#[from] StoreError),
}

/// Command-line values that replace file settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_path: Option<String>,
    pub bind_address: Option<String>,
    pub assets_dir: Option<PathBuf>,
    pub upstream: Option<String>,
}

impl Overrides {
    pub fn apply(self, config: &mut EdgeConfig) {
        if let Some(base_path) = self.base_path {
            config.base_path = base_path;
        }
        if let Some(bind_address) = self.bind_address {
            config.listener.bind_address = bind_address;
        }
        if let Some(root) = self.assets_dir {
            let index = match &config.assets {
                AssetSourceConfig::Directory { index, .. } => index.clone(),
                AssetSourceConfig::Upstream { .. } => "index.html".to_string(),
            };
            config.assets = AssetSourceConfig::Directory { root, index };
        }
        if let Some(url) = self.upstream {
            config.assets = AssetSourceConfig::Upstream { url };
        }
    }
}

/// Read the optional config file, apply overrides and validate.
pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<EdgeConfig, StartupError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => EdgeConfig::default(),
    };
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the edge router described by a validated config.
pub fn build_router(config: &EdgeConfig) -> Result<EdgeRouter, StartupError> {
    let base_path = BasePath::parse(&config.base_path)?;
    let store = assets::from_config(config)?;
    tracing::info!(base_path = %base_path, "Edge router ready");
    Ok(EdgeRouter::new(base_path, store))
}
