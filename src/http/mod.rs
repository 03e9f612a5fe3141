//! HTTP host subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → request.rs (request ID)
//!     → routing::EdgeRouter (gate, fetch, fallback)
//!     → response.rs (cache/CORS policy, SPA shell, 404)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{AssetClass, HeaderPolicy};
pub use server::HttpServer;
