//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router dispatching every path to the edge router
//! - Wire up middleware (tracing, timeout, request ID)
//! - Record per-request metrics
//! - Serve until shutdown is signalled, then drain

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::EdgeConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::EdgeRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<EdgeRouter>,
}

/// HTTP host for the edge router.
pub struct HttpServer {
    router: Router,
    config: EdgeConfig,
}

impl HttpServer {
    pub fn new(config: EdgeConfig, edge: EdgeRouter) -> Self {
        let state = AppState {
            router: Arc::new(edge),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(edge_handler))
            .route("/", any(edge_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The configured Axum router, for in-process use without a listener.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_path = %self.config.base_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Answer one request through the edge router.
async fn edge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, _body) = request.into_parts();

    tracing::debug!(
        request_id = %request_id(&parts.headers),
        method = %parts.method,
        path = %parts.uri.path(),
        "Routing request"
    );

    let (outcome, response) = state.router.route(&parts).await;
    metrics::record_request(outcome, response.status().as_u16(), start_time);

    tracing::debug!(
        request_id = %request_id(&parts.headers),
        outcome = %outcome,
        status = %response.status(),
        "Request answered"
    );

    response
}
