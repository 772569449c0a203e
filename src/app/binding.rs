//! Positional argument binding.
//!
//! Path arguments bind to declared parameters in order. Fewer arguments than
//! the action requires is an `ArityMismatch`; trailing parameters that carry
//! a default bind as absent; surplus arguments are dropped.

use crate::routing::{ActionDescriptor, RoutingError};

/// Parameter name → bound value, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArgs {
    values: Vec<(String, Option<String>)>,
}

impl BoundArgs {
    /// Value bound to `name`; `None` when absent or undeclared.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(param, _)| param == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|(_, value)| value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values
            .iter()
            .map(|(param, value)| (param.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bind `args` to the parameters of `signature`.
pub fn bind_arguments(
    controller: &str,
    signature: &ActionDescriptor,
    args: &[String],
) -> Result<BoundArgs, RoutingError> {
    let required = signature.required_params();
    if args.len() < required {
        return Err(RoutingError::ArityMismatch {
            controller: controller.to_owned(),
            action: signature.name().to_owned(),
            required,
            given: args.len(),
        });
    }

    let params = signature.params();
    if args.len() > params.len() {
        tracing::debug!(
            controller = %controller,
            action = %signature.name(),
            surplus = args.len() - params.len(),
            "Ignoring surplus path arguments"
        );
    }

    let values = params
        .iter()
        .enumerate()
        .map(|(index, param)| (param.clone(), args.get(index).cloned()))
        .collect();

    Ok(BoundArgs { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::introspect;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn questions() -> ActionDescriptor {
        ActionDescriptor::new("questions").with_params(["test_id", "question_idx"])
    }

    #[test]
    fn test_binds_in_declaration_order() {
        let bound = bind_arguments("TestsController", &questions(), &args(&["7", "2"])).unwrap();
        assert_eq!(bound.get("test_id"), Some("7"));
        assert_eq!(bound.get("question_idx"), Some("2"));
        assert_eq!(bound.positional(1), Some("2"));
        assert_eq!(
            bound.iter().collect::<Vec<_>>(),
            vec![("test_id", Some("7")), ("question_idx", Some("2"))]
        );
    }

    #[test]
    fn test_too_few_arguments() {
        let err = bind_arguments("TestsController", &questions(), &args(&["2"])).unwrap_err();
        match err {
            RoutingError::ArityMismatch {
                controller,
                action,
                required,
                given,
            } => {
                assert_eq!(controller, "TestsController");
                assert_eq!(action, "questions");
                assert_eq!(required, 2);
                assert_eq!(given, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_defaulted_parameters_bind_absent() {
        let descriptor = introspect("class A { public function page($id, $tab = 'info') {} }").unwrap();
        let page = descriptor.action("page").unwrap();

        let bound = bind_arguments("A", page, &args(&["3"])).unwrap();
        assert_eq!(bound.len(), 2);
        assert_eq!(bound.get("id"), Some("3"));
        assert_eq!(bound.get("tab"), None);
    }

    #[test]
    fn test_surplus_arguments_are_dropped() {
        let index = ActionDescriptor::new("index");
        let bound = bind_arguments("TestsController", &index, &args(&["x", "y"])).unwrap();
        assert!(bound.is_empty());
        assert_eq!(bound.positional(0), None);
    }
}
