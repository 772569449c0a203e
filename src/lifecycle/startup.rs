//! Startup orchestration.
//!
//! # Responsibilities
//! - Assemble the application from validated configuration
//! - Build the route table up front and report unimplemented controllers
//! - Start the metrics exporter, bind the listener, run until shutdown
//!
//! # Design Decisions
//! - Fail fast: a missing view root or a route table that does not build
//!   is fatal
//! - Listener binds last (traffic only when ready)

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::app::{Application, ControllerRegistry};
use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::routing::RoutingError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route table: {0}")]
    Routing(#[from] RoutingError),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the application and warm its route table.
pub fn prepare(config: &AppConfig, registry: ControllerRegistry) -> Result<Arc<Application>, StartupError> {
    let app = Application::from_config(config, registry);
    app.warm_up()?;
    Ok(Arc::new(app))
}

/// Serve `app` on the configured address until `shutdown` fires.
pub async fn serve(config: AppConfig, app: Arc<Application>, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(config, app)
        .run(listener, shutdown.subscribe())
        .await?;
    Ok(())
}
