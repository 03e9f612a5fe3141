//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Served response (asset hit or SPA fallback):
//!     → headers.rs (frame, sniffing, referrer, permissions, CSP)
//!     → Return to client
//! ```
//!
//! # Design Decisions
//! - One fixed header set for every served response
//! - Fast-reject and double-miss 404s carry none of it

pub mod headers;

pub use headers::{apply_security_headers, has_security_headers};
