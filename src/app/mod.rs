//! Application assembly.
//!
//! # Data Flow
//! ```text
//! AppRequest (method, rewritten query, inputs)
//!     → RouteTableCache::get (memoized table)
//!     → Router::resolve (controller → action → view)
//!     → ControllerRegistry::get (implementation by type name)
//!     → bind_arguments (positional args → declared params)
//!     → Controller::invoke
//!     → Renderer::render (View) or Location (Redirect)
//! ```
//!
//! # Design Decisions
//! - Synchronous: every step is file-system or CPU bound, the HTTP front end
//!   runs it on the blocking pool
//! - Errors propagate unchanged to the front end, which picks the status code

pub mod binding;
pub mod controller;
pub mod error;
pub mod registry;
pub mod render;

use axum::http::Method;

pub use binding::{bind_arguments, BoundArgs};
pub use controller::{ActionError, ActionOutcome, Controller, Inputs, RequestContext, ViewData};
pub use error::AppError;
pub use registry::ControllerRegistry;
pub use render::{PlaceholderRenderer, RenderError, Renderer};

use crate::config::AppConfig;
use crate::observability::metrics;
use crate::routing::{RouteTableCache, Router, RouterSettings, RoutingError};

/// One request as seen by the dispatcher.
#[derive(Debug, Clone)]
pub struct AppRequest {
    pub method: Method,
    /// `url=...` query produced by the rewrite step; `None` for the bare entry point.
    pub rewritten: Option<String>,
    pub inputs: Inputs,
}

impl AppRequest {
    pub fn get(rewritten: Option<&str>) -> Self {
        Self {
            method: Method::GET,
            rewritten: rewritten.map(str::to_owned),
            inputs: Inputs::new(),
        }
    }
}

/// Successful dispatch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppResponse {
    Html(String),
    Redirect(String),
}

/// Routing engine plus controller implementations.
pub struct Application {
    settings: RouterSettings,
    cache: RouteTableCache,
    registry: ControllerRegistry,
    renderer: Box<dyn Renderer>,
}

impl Application {
    pub fn new(settings: RouterSettings, cache: RouteTableCache, registry: ControllerRegistry) -> Self {
        Self {
            settings,
            cache,
            registry,
            renderer: Box::new(PlaceholderRenderer),
        }
    }

    pub fn from_config(config: &AppConfig, registry: ControllerRegistry) -> Self {
        Self::new(
            RouterSettings::from_config(config),
            RouteTableCache::from_config(config),
            registry,
        )
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    pub fn cache(&self) -> &RouteTableCache {
        &self.cache
    }

    /// Check the view root, build the route table and report controllers
    /// without an implementation.
    ///
    /// Returns the missing type names; a missing view root or a table that
    /// fails to build is an error.
    pub fn warm_up(&self) -> Result<Vec<String>, RoutingError> {
        self.settings.check_view_root()?;
        let table = self.cache.get()?;
        let missing = self.registry.verify(&table);
        for name in &missing {
            tracing::warn!(controller = %name, "Controller has no registered implementation");
        }
        tracing::info!(
            controllers = table.len(),
            registered = self.registry.len(),
            "Application ready"
        );
        Ok(missing)
    }

    /// Dispatch one request.
    pub fn handle(&self, request: &AppRequest) -> Result<AppResponse, AppError> {
        self.dispatch(request).inspect_err(|e| {
            metrics::record_dispatch_error(e.kind());
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(kind = e.kind(), error = %e, "Dispatch failed");
            } else {
                tracing::info!(kind = e.kind(), error = %e, "Request not routed");
            }
        })
    }

    fn dispatch(&self, request: &AppRequest) -> Result<AppResponse, AppError> {
        let table = self.cache.get()?;
        let router = Router::resolve(table, &self.settings, request.rewritten.as_deref())?;

        let controller = self
            .registry
            .get(router.controller())
            .ok_or_else(|| AppError::ControllerNotRegistered(router.controller().to_owned()))?;

        let args = bind_arguments(router.controller(), router.signature(), router.args())?;
        let ctx = RequestContext::new(request.method.clone(), &request.inputs, &router);

        tracing::debug!(
            controller = %router.controller(),
            action = %router.action(),
            method = %request.method,
            "Invoking action"
        );

        match controller.invoke(router.action(), &args, &ctx)? {
            ActionOutcome::View(data) => {
                let body = self.renderer.render(router.view(), &data)?;
                Ok(AppResponse::Html(body))
            }
            ActionOutcome::Redirect(location) => Ok(AppResponse::Redirect(location)),
        }
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("settings", &self.settings)
            .field("cache", &self.cache)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
