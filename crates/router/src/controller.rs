//! Named controller delegation.
//!
//! Handlers can forward to controller objects registered by name instead of
//! inlining their logic. Unknown controllers or methods are fatal errors
//! surfaced to the request boundary, never silently swallowed.

use crate::error::RouterError;
use crate::request::RouteParams;

use std::collections::HashMap;

use serde_json::Value;
use tracing::error;

/// A named controller object. Implementations dispatch on `method` and
/// return [`RouterError::UnknownMethod`] for names they do not know.
pub trait Controller: Send + Sync {
    fn invoke(&self, method: &str, params: &RouteParams) -> Result<Value, RouterError>;
}

/// Name-keyed registry of controller objects, populated at bootstrap.
#[derive(Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Box<dyn Controller>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C>(&mut self, name: impl Into<String>, controller: C)
    where
        C: Controller + 'static,
    {
        self.controllers.insert(name.into(), Box::new(controller));
    }

    /// Execute `method` on the controller registered under `name`.
    pub fn invoke(
        &self,
        name: &str,
        method: &str,
        params: &RouteParams,
    ) -> Result<Value, RouterError> {
        let Some(controller) = self.controllers.get(name) else {
            error!(controller = name, "controller is not registered");
            return Err(RouterError::unknown_controller(name));
        };
        controller.invoke(method, params)
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("controllers", &self.controllers.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct UserController;

    impl Controller for UserController {
        fn invoke(&self, method: &str, params: &RouteParams) -> Result<Value, RouterError> {
            match method {
                "show" => Ok(json!({ "id": params.get("id") })),
                _ => Err(RouterError::unknown_method("UserController", method)),
            }
        }
    }

    #[test]
    fn invokes_a_registered_controller() {
        let mut registry = ControllerRegistry::new();
        registry.register("UserController", UserController);

        let params = RouteParams::new(vec![("id".to_string(), "7".to_string())]);
        let result = registry.invoke("UserController", "show", &params).unwrap();
        assert_eq!(result, json!({ "id": "7" }));
    }

    #[test]
    fn unknown_controller_is_fatal() {
        let registry = ControllerRegistry::new();
        let result = registry.invoke("Missing", "show", &RouteParams::empty());
        assert!(matches!(result, Err(RouterError::UnknownController { .. })));
    }

    #[test]
    fn unknown_method_is_fatal() {
        let mut registry = ControllerRegistry::new();
        registry.register("UserController", UserController);

        let result = registry.invoke("UserController", "destroy", &RouteParams::empty());
        assert!(matches!(result, Err(RouterError::UnknownMethod { .. })));
    }
}
