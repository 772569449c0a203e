//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → rewrite.rs (path under mount → "url=<path>&<query>")
//!     → request.rs (request ID, merged inputs)
//!     → Application::handle (blocking pool)
//!     → response.rs (HTML, 303 redirect, or failure page)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod rewrite;
pub mod server;

pub use request::{RequestUuid, X_REQUEST_ID};
pub use rewrite::{rewrite_request, RewriteOutcome};
pub use server::HttpServer;
