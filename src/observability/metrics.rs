//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): requests by outcome and status
//! - `edge_request_duration_seconds` (histogram): latency by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Outcome labels are the router's terminal states

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::Outcome;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one answered request.
pub fn record_request(outcome: Outcome, status: u16, start: Instant) {
    ::metrics::counter!(
        "edge_requests_total",
        "outcome" => outcome.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("edge_request_duration_seconds", "outcome" => outcome.as_str())
        .record(start.elapsed().as_secs_f64());
}
