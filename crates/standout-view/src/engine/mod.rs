//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, the seam through which a
//! template dialect plugs into the view controller. An engine turns a view name
//! plus a [`RenderContext`] into content, or reports that it does not know the
//! view with [`ViewError::ViewNotFound`].
//!
//! ## Engines
//!
//! | Engine | Source of templates |
//! |--------|---------------------|
//! | [`FileEngine`] | Files found through a [`Dirs`](crate::Dirs) list, read on every render |
//! | [`EnvironmentEngine`] | A caller-configured `minijinja::Environment` |
//! | [`EngineChain`] | Other engines, tried in order |
//!
//! ## Template Context
//!
//! Engines never receive ambient state. Everything a template may use is in
//! the [`RenderContext`]: the merged data map and a handle to the controller,
//! exposed to minijinja templates as the reserved variable `view`:
//!
//! ```jinja
//! <title>{{ title }}</title>
//! {{ view.render("inc/footer") }}
//! {{ view.assets("footer") }}
//! ```

mod chain;
mod environment;
mod file;
pub mod filters;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::data::DataMap;
use crate::error::ViewError;
use crate::view::View;

pub use chain::EngineChain;
pub use environment::EnvironmentEngine;
pub use file::FileEngine;

/// Extension appended to view names by the built-in engines.
pub const DEFAULT_EXTENSION: &str = ".jinja";

/// Name under which the controller is exposed to templates.
pub const VIEW_KEY: &str = "view";

/// A template engine that can render views by name.
///
/// Implementations must return [`ViewError::ViewNotFound`] when they cannot
/// locate `view`, so that an [`EngineChain`] can move on to the next engine.
/// Any other error is treated as a hard failure.
pub trait TemplateEngine: Send + Sync {
    /// Renders `view` with the given context.
    fn render(&self, view: &str, context: &RenderContext) -> Result<String, ViewError>;

    /// Checks whether `view` can be rendered by this engine.
    fn exists(&self, view: &str) -> bool;
}

impl<E: TemplateEngine + ?Sized> TemplateEngine for Box<E> {
    fn render(&self, view: &str, context: &RenderContext) -> Result<String, ViewError> {
        (**self).render(view, context)
    }

    fn exists(&self, view: &str) -> bool {
        (**self).exists(view)
    }
}

impl<E: TemplateEngine + ?Sized> TemplateEngine for Arc<E> {
    fn render(&self, view: &str, context: &RenderContext) -> Result<String, ViewError> {
        (**self).render(view, context)
    }

    fn exists(&self, view: &str) -> bool {
        (**self).exists(view)
    }
}

/// Everything a template receives: the data map and the controller.
#[derive(Debug, Clone)]
pub struct RenderContext {
    data: DataMap,
    view: View,
}

impl RenderContext {
    /// Creates a context.
    pub fn new(data: DataMap, view: View) -> Self {
        Self { data, view }
    }

    /// The data bound as template variables.
    pub fn data(&self) -> &DataMap {
        &self.data
    }

    /// The controller, for engines that render sub-views themselves.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Builds the minijinja context: every data entry plus `view`.
    pub fn template_value(&self) -> minijinja::Value {
        let mut ctx: BTreeMap<String, minijinja::Value> = self
            .data
            .iter()
            .map(|(key, value)| (key.clone(), minijinja::Value::from_serialize(value)))
            .collect();
        ctx.insert(VIEW_KEY.to_string(), self.view.template_object());
        minijinja::Value::from(ctx)
    }

    pub(crate) fn not_found(&self, view: &str) -> ViewError {
        ViewError::not_found(view, self.data.clone())
    }
}
