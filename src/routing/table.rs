//! Route table construction.
//!
//! # Responsibilities
//! - Scan the controller directory (non-recursive, regular files only)
//! - Introspect each source unit into a `ControllerDescriptor`
//! - Enforce file-name / type-name agreement and type uniqueness
//!
//! # Design Decisions
//! - Files are processed in sorted order so diagnostics are deterministic
//! - The table is immutable once built; sharing happens through `Arc`
//! - Any integrity violation is fatal for the whole build

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::observability::metrics;
use crate::routing::error::RoutingError;
use crate::routing::introspect::introspect_all;

/// Suffix every controller type name carries.
pub const CONTROLLER_SUFFIX: &str = "Controller";

/// Strip the `Controller` suffix: `TestsController` → `Tests`.
pub fn short_name(type_name: &str) -> &str {
    type_name.strip_suffix(CONTROLLER_SUFFIX).unwrap_or(type_name)
}

/// A public action and its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    name: String,
    params: Vec<String>,
    required: usize,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            required: 0,
        }
    }

    /// Builder used by fixtures and the introspector.
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self.required = self.params.len();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter names in declaration (binding) order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Number of leading parameters that must be bound.
    pub fn required_params(&self) -> usize {
        self.required
    }

    pub fn accepts_positional_arguments(&self) -> bool {
        !self.params.is_empty()
    }

    pub(crate) fn push_param(&mut self, name: &str) {
        self.params.push(name.to_owned());
    }

    pub(crate) fn set_required(&mut self, required: usize) {
        self.required = required.min(self.params.len());
    }
}

/// A controller type and its actions, in source declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDescriptor {
    name: String,
    actions: IndexMap<String, ActionDescriptor>,
}

impl ControllerDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: IndexMap::new(),
        }
    }

    /// Builder used by fixtures.
    pub fn with_action(mut self, action: ActionDescriptor) -> Self {
        self.insert_action(action);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    pub fn action(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions.get(name)
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.actions.values()
    }

    pub(crate) fn insert_action(&mut self, action: ActionDescriptor) {
        self.actions.insert(action.name.clone(), action);
    }
}

/// Controller type name → descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    controllers: BTreeMap<String, ControllerDescriptor>,
}

impl RouteTable {
    /// Build the table from a controller directory.
    ///
    /// Only files whose extension equals `extension` are considered; an empty
    /// `extension` admits every regular file.
    pub fn build(dir: &Path, extension: &str) -> Result<Self, RoutingError> {
        let started = Instant::now();
        let files = controller_files(dir, extension)?;

        let mut table = RouteTable::default();
        for path in &files {
            table.load_file(path)?;
        }

        metrics::record_route_table_build(started, table.len());
        tracing::debug!(
            dir = %dir.display(),
            controllers = table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Route table built"
        );
        Ok(table)
    }

    /// Add a descriptor, rejecting duplicate type names.
    pub fn insert(&mut self, descriptor: ControllerDescriptor) -> Result<(), RoutingError> {
        if self.controllers.contains_key(descriptor.name()) {
            return Err(RoutingError::DuplicateController(descriptor.name));
        }
        self.controllers.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, controller: &str) -> Option<&ControllerDescriptor> {
        self.controllers.get(controller)
    }

    pub fn contains(&self, controller: &str) -> bool {
        self.controllers.contains_key(controller)
    }

    /// Controllers in type-name order.
    pub fn controllers(&self) -> impl Iterator<Item = &ControllerDescriptor> {
        self.controllers.values()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    fn load_file(&mut self, path: &Path) -> Result<(), RoutingError> {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let bytes = fs::read(path).map_err(|source| RoutingError::Configuration {
            path: path.to_path_buf(),
            source,
        })?;
        let source = String::from_utf8_lossy(&bytes);

        let declared = introspect_all(&source);
        if declared.len() > 1 {
            tracing::warn!(
                file = %file,
                types = declared.len(),
                "Controller source declares more than one type, using the first"
            );
        }

        match declared.into_iter().next() {
            Some(descriptor) if descriptor.name() == stem => {
                tracing::trace!(
                    controller = %descriptor.name(),
                    actions = descriptor.actions().count(),
                    "Controller introspected"
                );
                self.insert(descriptor)
            }
            other => Err(RoutingError::SchemaMismatch {
                file,
                parsed: other.map(|d| d.name).unwrap_or_default(),
            }),
        }
    }
}

/// Regular, non-hidden files of `dir` carrying `extension`, sorted by name.
fn controller_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, RoutingError> {
    let configuration = |source| RoutingError::Configuration {
        path: dir.to_path_buf(),
        source,
    };

    if !dir.is_dir() {
        return Err(configuration(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "controller directory not found",
        )));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(configuration)? {
        let path = entry.map_err(configuration)?.path();
        if !path.is_file() {
            continue;
        }

        let hidden = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'));
        let matches_extension = extension.is_empty()
            || path.extension().is_some_and(|ext| ext == extension);

        if hidden || !matches_extension {
            tracing::debug!(file = %path.display(), "Skipping non-controller file");
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}
