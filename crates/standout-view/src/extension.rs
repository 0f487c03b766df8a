//! Named helper functions callable on a [`View`].
//!
//! Extensions add behavior to the controller without subclassing it. Each is a
//! function of the controller and a list of JSON arguments, registered under a
//! name. Rust code calls them through [`View::invoke`]; templates call them as
//! methods of the `view` object:
//!
//! ```jinja
//! {{ view.route("blog.show", 42) }}
//! {{ view.call("route", "blog.show", 42) }}
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ViewError;
use crate::view::View;

/// Shared extension handler.
pub type ExtensionFn = Arc<dyn Fn(&View, &[Value]) -> Result<Value, ViewError> + Send + Sync>;

/// Name to handler registry.
#[derive(Clone, Default)]
pub struct Extensions {
    handlers: HashMap<String, ExtensionFn>,
}

impl Extensions {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous one.
    pub fn add<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&View, &[Value]) -> Result<Value, ViewError> + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    /// Returns true if a handler is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Returns the handler registered under `name`.
    pub fn get(&self, name: &str) -> Option<ExtensionFn> {
        self.handlers.get(name).cloned()
    }

    /// Unregisters `name`, returning its handler.
    pub fn remove(&mut self, name: &str) -> Option<ExtensionFn> {
        self.handlers.remove(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineChain;
    use serde_json::json;

    #[test]
    fn test_register_and_call() {
        let mut extensions = Extensions::new();
        extensions.add("upper", |_view, args| {
            let text = args.first().and_then(Value::as_str).unwrap_or_default();
            Ok(json!(text.to_uppercase()))
        });

        assert!(extensions.has("upper"));
        assert!(!extensions.has("lower"));

        let handler = extensions.get("upper").unwrap();
        let view = View::new(EngineChain::new());
        assert_eq!(handler(&view, &[json!("abc")]).unwrap(), json!("ABC"));
    }

    #[test]
    fn test_replace_and_remove() {
        let mut extensions = Extensions::new();
        extensions
            .add("a", |_, _| Ok(json!(1)))
            .add("b", |_, _| Ok(json!(2)))
            .add("a", |_, _| Ok(json!(3)));

        assert_eq!(extensions.names(), ["a", "b"]);
        assert_eq!(extensions.len(), 2);

        let view = View::new(EngineChain::new());
        assert_eq!(extensions.get("a").unwrap()(&view, &[]).unwrap(), json!(3));

        assert!(extensions.remove("a").is_some());
        assert!(extensions.remove("a").is_none());
        assert_eq!(extensions.names(), ["b"]);
    }
}
