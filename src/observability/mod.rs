//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Edge router and stores produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is attached by the HTTP layer and shows up
//!   in the request span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
