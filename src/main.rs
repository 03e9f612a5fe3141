//! Minimal-pairs edge server.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                 EDGE ROUTER                  │
//!   Client Request      │  ┌────────┐   ┌───────────┐   ┌───────────┐  │
//!   ────────────────────┼─▶│  http  │──▶│  routing  │──▶│  assets   │◀─┼── dist/ or
//!                       │  │ server │   │ base path │   │   store   │  │   upstream
//!                       │  └────────┘   └─────┬─────┘   └───────────┘  │
//!                       │                     │ hit / SPA fallback     │
//!   Client Response     │  ┌────────────────┐ ▼                        │
//!   ◀───────────────────┼──│ cache, CORS,   │◀┘                        │
//!                       │  │ security hdrs  │                          │
//!                       │  └────────────────┘                          │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use minimal_pairs_edge::http::HttpServer;
use minimal_pairs_edge::lifecycle::startup::{self, Overrides};
use minimal_pairs_edge::lifecycle::{signals, Shutdown};
use minimal_pairs_edge::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "minimal-pairs-edge")]
#[command(about = "Static-asset edge router for the minimal-pairs drill", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = "EDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Prefix all content is mounted under.
    #[arg(long, env = "EDGE_BASE_PATH")]
    base_path: Option<String>,

    /// Listener address, e.g. 0.0.0.0:8080.
    #[arg(long, env = "EDGE_BIND")]
    bind: Option<String>,

    /// Serve assets from this build directory.
    #[arg(long, env = "EDGE_ASSETS_DIR", conflicts_with = "upstream")]
    assets_dir: Option<PathBuf>,

    /// Fetch assets from this HTTP origin.
    #[arg(long, env = "EDGE_UPSTREAM")]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let overrides = Overrides {
        base_path: args.base_path,
        bind_address: args.bind,
        assets_dir: args.assets_dir,
        upstream: args.upstream,
    };
    let config = startup::load(args.config.as_deref(), overrides)?;

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "minimal-pairs-edge starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_path = %config.base_path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validated at load time.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let edge = startup::build_router(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, edge);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
