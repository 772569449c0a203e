//! MVC routing and dispatch engine for the quiz application.
//!
//! Controllers are discovered by scanning their source files, requests are
//! resolved against the resulting route table, and links are generated back
//! through the same table.

pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod quiz;
pub mod routing;

pub use app::{Application, ControllerRegistry};
pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteTable, Router, RoutingError};
