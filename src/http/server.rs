//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the front-controller handler
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener and stop on the shutdown signal
//! - Hand each request to the application on the blocking pool

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app::{AppRequest, AppResponse, Application};
use crate::config::AppConfig;
use crate::http::request::{is_form, parse_inputs, request_id, RequestUuid, X_REQUEST_ID};
use crate::http::response::failure_response;
use crate::http::rewrite::{rewrite_request, RewriteOutcome};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
    pub mount_path: Arc<str>,
}

/// HTTP front end for the application.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, app: Arc<Application>) -> Self {
        let state = AppState {
            app,
            mount_path: Arc::from(config.routing.mount_path.as_str()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id(request.headers()),
            )
        });

        Router::new()
            .route("/", get(dispatch_handler).post(dispatch_handler))
            .route("/{*path}", get(dispatch_handler).post(dispatch_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), RequestUuid))
                    .layer(trace)
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.server.request_timeout_secs,
                    ))),
            )
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_path = %self.config.routing.mount_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Front controller: rewrite, dispatch, respond.
async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let rewritten = match rewrite_request(&state.mount_path, &uri) {
        RewriteOutcome::Outside => {
            tracing::debug!(path = %uri.path(), "Outside mount path");
            metrics::record_request("not_served");
            return (StatusCode::NOT_FOUND, "Not Found").into_response();
        }
        RewriteOutcome::EntryPoint => None,
        RewriteOutcome::Rewritten(query) => Some(query),
    };

    let form = is_form(&headers).then_some(&body[..]);
    let request = AppRequest {
        method,
        inputs: parse_inputs(uri.query(), form),
        rewritten,
    };

    tracing::debug!(
        request_id = %request_id(&headers),
        rewritten = ?request.rewritten,
        "Dispatching request"
    );

    let app = Arc::clone(&state.app);
    let span = tracing::Span::current();
    let result = tokio::task::spawn_blocking(move || span.in_scope(|| app.handle(&request))).await;

    match result {
        Ok(Ok(response)) => {
            metrics::record_request(match response {
                AppResponse::Html(_) => "view",
                AppResponse::Redirect(_) => "redirect",
            });
            response.into_response()
        }
        Ok(Err(e)) => {
            metrics::record_request("error");
            e.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Dispatch task failed");
            metrics::record_request("error");
            failure_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}
