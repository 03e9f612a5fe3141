//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (origin, path, query)
//!     → matcher.rs (base path gate, asset path rewrite)
//!     → router.rs (asset fetch, hit decoration or SPA fallback)
//!     → Return: exactly one response per request
//!
//! Per-request states:
//!     START → REJECTED[404]
//!     START → FETCHING_ASSET → HIT[200]
//!     START → FETCHING_ASSET → MISS → FETCHING_FALLBACK → FALLBACK_HIT[200]
//!     START → FETCHING_ASSET → MISS → FETCHING_FALLBACK → FALLBACK_MISS → REJECTED[404]
//! ```
//!
//! # Design Decisions
//! - Base path parsed at startup, immutable at runtime
//! - Deterministic: same input and store always yield the same response
//! - No shared mutable state between requests

pub mod matcher;
pub mod router;

pub use matcher::{AssetPath, BasePath, BasePathError};
pub use router::{EdgeRouter, Outcome};
