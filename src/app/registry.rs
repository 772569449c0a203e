//! Controller implementations by type name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::app::controller::Controller;
use crate::routing::RouteTable;

#[derive(Default, Clone)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Arc<dyn Controller>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller under its declared type name, replacing any previous one.
    pub fn register<C: Controller + 'static>(&mut self, controller: C) -> &mut Self {
        let name = controller.name().to_owned();
        if self.controllers.insert(name.clone(), Arc::new(controller)).is_some() {
            tracing::warn!(controller = %name, "Controller registered twice, keeping the last");
        }
        self
    }

    pub fn with<C: Controller + 'static>(mut self, controller: C) -> Self {
        self.register(controller);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Controller>> {
        self.controllers.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Route-table controllers with no registered implementation, sorted.
    pub fn verify(&self, table: &RouteTable) -> Vec<String> {
        table
            .controllers()
            .map(|descriptor| descriptor.name())
            .filter(|name| !self.controllers.contains_key(*name))
            .map(str::to_owned)
            .collect()
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.controllers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ControllerRegistry")
            .field("controllers", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::binding::BoundArgs;
    use crate::app::controller::{ActionError, ActionOutcome, RequestContext, ViewData};
    use crate::routing::ControllerDescriptor;

    struct Named(&'static str);

    impl Controller for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn invoke(
            &self,
            _action: &str,
            _args: &BoundArgs,
            _ctx: &RequestContext<'_>,
        ) -> Result<ActionOutcome, ActionError> {
            Ok(ActionOutcome::View(ViewData::new()))
        }
    }

    #[test]
    fn test_lookup_by_type_name() {
        let registry = ControllerRegistry::new().with(Named("TestsController"));
        assert!(registry.get("TestsController").is_some());
        assert!(registry.get("Tests").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_verify_reports_missing_implementations() {
        let mut table = RouteTable::default();
        table.insert(ControllerDescriptor::new("UsersController")).unwrap();
        table.insert(ControllerDescriptor::new("TestsController")).unwrap();
        table.insert(ControllerDescriptor::new("AdminController")).unwrap();

        let registry = ControllerRegistry::new().with(Named("TestsController"));
        assert_eq!(registry.verify(&table), vec!["AdminController", "UsersController"]);
    }
}
