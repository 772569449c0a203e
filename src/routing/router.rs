//! Route resolution and reverse URL generation.
//!
//! # Responsibilities
//! - Resolve the current request into a `ResolvedRoute`
//! - Validate controller, then action, then view (fail-fast in that order)
//! - Generate outbound links through the same route table
//!
//! # Design Decisions
//! - Immutable after construction; one `Router` per request
//! - Explicit errors rather than silent default routes
//! - The route table is shared, never a process-wide singleton

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::routing::error::RoutingError;
use crate::routing::path::ParsedPath;
use crate::routing::table::{
    short_name, ActionDescriptor, ControllerDescriptor, RouteTable, CONTROLLER_SUFFIX,
};

/// Process-wide, immutable inputs to route resolution.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub default_controller: String,
    pub default_action: String,
    pub view_dir: PathBuf,
    pub view_extension: String,
    /// Script mount path prefixed to generated links, e.g. `/` or `/quiz/`.
    pub mount_path: String,
}

impl RouterSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            default_controller: config.routing.default_controller.clone(),
            default_action: config.routing.default_action.clone(),
            view_dir: config.paths.view_dir.clone(),
            view_extension: config.paths.view_extension.clone(),
            mount_path: config.routing.mount_path.clone(),
        }
    }

    /// The view root must be an existing directory.
    pub fn check_view_root(&self) -> Result<(), RoutingError> {
        if self.view_dir.is_dir() {
            Ok(())
        } else {
            Err(RoutingError::Configuration {
                path: self.view_dir.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "view directory not found"),
            })
        }
    }

    /// `<view-root>/<ControllerShortName>/<action>.<ext>`, which must exist.
    ///
    /// A missing view root is a `Configuration` error, not a missing view.
    pub fn resolve_view(&self, controller: &str, action: &str) -> Result<PathBuf, RoutingError> {
        self.check_view_root()?;
        let path = self
            .view_dir
            .join(short_name(controller))
            .join(format!("{action}.{}", self.view_extension));

        if path.is_file() {
            Ok(path)
        } else {
            Err(RoutingError::ViewNotFound { path })
        }
    }
}

/// The concrete route computed for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub controller: String,
    pub action: String,
    pub args: Vec<String>,
    pub view: PathBuf,
    pub query: String,
}

/// How `Router::build_url` treats positional arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlArgs<'a> {
    /// Reuse the current request's arguments.
    #[default]
    Inherit,
    /// Drop all arguments.
    Reset,
    /// Use these arguments verbatim. An empty slice behaves like `Inherit`.
    Replace(&'a [String]),
}

impl<'a> From<&'a [String]> for UrlArgs<'a> {
    fn from(args: &'a [String]) -> Self {
        if args.is_empty() {
            UrlArgs::Inherit
        } else {
            UrlArgs::Replace(args)
        }
    }
}

impl<'a> From<&'a Vec<String>> for UrlArgs<'a> {
    fn from(args: &'a Vec<String>) -> Self {
        UrlArgs::from(args.as_slice())
    }
}

impl<'a> From<Option<&'a [String]>> for UrlArgs<'a> {
    fn from(args: Option<&'a [String]>) -> Self {
        args.map_or(UrlArgs::Reset, UrlArgs::from)
    }
}

/// Dispatcher for one request.
#[derive(Debug, Clone)]
pub struct Router {
    table: Arc<RouteTable>,
    mount_path: String,
    signature: ActionDescriptor,
    route: ResolvedRoute,
}

impl Router {
    /// Resolve the current request.
    ///
    /// `rewritten` is the rewritten query string (`url=...`); `None` means the
    /// bare entry point was requested and the configured defaults apply.
    pub fn resolve(
        table: Arc<RouteTable>,
        settings: &RouterSettings,
        rewritten: Option<&str>,
    ) -> Result<Self, RoutingError> {
        let (controller, action, args, query) = match rewritten {
            None => (
                settings.default_controller.clone(),
                settings.default_action.clone(),
                Vec::new(),
                String::new(),
            ),
            Some(raw) => {
                let (controller, action, args, query) = ParsedPath::parse(raw)?.into_parts();
                let controller = if controller.is_empty() {
                    settings.default_controller.clone()
                } else {
                    format!("{controller}{CONTROLLER_SUFFIX}")
                };
                let action = if action.is_empty() {
                    settings.default_action.clone()
                } else {
                    action
                };
                (controller, action, args, query)
            }
        };

        let descriptor = validate_controller(&table, &controller)?;
        let signature = validate_action(descriptor, &action)?.clone();
        let view = settings.resolve_view(&controller, &action)?;

        tracing::debug!(
            controller = %controller,
            action = %action,
            args = ?args,
            view = %view.display(),
            "Route resolved"
        );

        Ok(Self {
            table,
            mount_path: settings.mount_path.clone(),
            signature,
            route: ResolvedRoute {
                controller,
                action,
                args,
                view,
                query,
            },
        })
    }

    /// Controller type name, e.g. `TestsController`.
    pub fn controller(&self) -> &str {
        &self.route.controller
    }

    /// Controller short name, e.g. `Tests`.
    pub fn controller_name(&self) -> &str {
        short_name(&self.route.controller)
    }

    pub fn action(&self) -> &str {
        &self.route.action
    }

    /// Declared signature of the resolved action.
    pub fn signature(&self) -> &ActionDescriptor {
        &self.signature
    }

    pub fn args(&self) -> &[String] {
        &self.route.args
    }

    pub fn view(&self) -> &Path {
        &self.route.view
    }

    pub fn query(&self) -> &str {
        &self.route.query
    }

    pub fn route(&self) -> &ResolvedRoute {
        &self.route
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Build a link relative to the current route.
    ///
    /// Empty `controller` or `action` reuse the current ones; non-empty values
    /// are validated against the route table first. See [`UrlArgs`] for the
    /// argument contract. `query` is appended verbatim.
    pub fn build_url(
        &self,
        controller: &str,
        action: &str,
        args: UrlArgs<'_>,
        query: &str,
    ) -> Result<String, RoutingError> {
        let controller = if controller.is_empty() {
            self.route.controller.as_str()
        } else {
            validate_controller(&self.table, controller)?.name()
        };

        let action = if action.is_empty() {
            self.route.action.as_str()
        } else {
            let descriptor = validate_controller(&self.table, controller)?;
            validate_action(descriptor, action)?.name()
        };

        let args: &[String] = match args {
            UrlArgs::Inherit => &self.route.args,
            UrlArgs::Replace(args) if args.is_empty() => &self.route.args,
            UrlArgs::Replace(args) => args,
            UrlArgs::Reset => &[],
        };

        Ok(format_url(
            &self.mount_path,
            &short_name(controller).to_lowercase(),
            action,
            args,
            query,
        ))
    }
}

fn validate_controller<'t>(
    table: &'t RouteTable,
    controller: &str,
) -> Result<&'t ControllerDescriptor, RoutingError> {
    table
        .get(controller)
        .ok_or_else(|| RoutingError::UnknownController(controller.to_owned()))
}

fn validate_action<'d>(
    descriptor: &'d ControllerDescriptor,
    action: &str,
) -> Result<&'d ActionDescriptor, RoutingError> {
    descriptor
        .action(action)
        .ok_or_else(|| RoutingError::UnknownAction {
            controller: descriptor.name().to_owned(),
            action: action.to_owned(),
        })
}

/// Assemble `<mount><controller>/<action>/<a1>/.../<aN><query>`.
///
/// With no action and no arguments the link is `<mount><controller><query>`.
pub fn format_url(mount: &str, controller: &str, action: &str, args: &[String], query: &str) -> String {
    if action.is_empty() && args.is_empty() {
        format!("{mount}{controller}{query}")
    } else {
        format!("{mount}{controller}/{action}/{}{query}", args.join("/"))
    }
}
