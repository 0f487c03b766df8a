//! The view controller.
//!
//! [`View`] ties the pieces together: it owns the [`Data`] store and the
//! [`Assets`] registry, holds the [`TemplateEngine`], and drives every render.
//!
//! ## Render Flow
//!
//! For `view.render("about", &data)`:
//!
//! 1. Refuse if `about` is already being rendered further up the stack
//!    ([`ViewError::CircularRender`]).
//! 2. Run the callbacks registered with [`View::on`] for `about`, each
//!    receiving the previous one's output.
//! 3. Merge the result into shared data.
//! 4. Resolve `about` through the aliases registered with [`View::add`].
//! 5. Render the resolved name with `Data::all("about")` plus the controller
//!    itself as the variable `view`.
//! 6. Once the outermost render finishes, replace asset placeholders in its
//!    output.
//!
//! A view no engine knows renders as empty content. Every other failure is
//! returned to the caller.
//!
//! ## Nesting
//!
//! Templates render partials through the `view` variable:
//!
//! ```jinja
//! <head>{{ view.assets("head") }}</head>
//! <body>{{ view.render("inc/footer", {"year": 2024}) }}</body>
//! ```
//!
//! Partials share the store and the registry with the page that includes them,
//! so an asset registered by the footer still lands in the page head: only the
//! outermost render flushes, after every partial has run.
//!
//! ## Sharing
//!
//! `View` is a handle. Cloning it is cheap and clones share all state, which is
//! how templates and callbacks reach the same controller. Data and assets can be
//! accessed directly with [`View::data`] and [`View::assets`]; those guards
//! must be dropped before rendering.

mod object;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use serde_json::Value;

use crate::assets::Assets;
use crate::data::{to_data_map, Data, DataMap, Scope};
use crate::engine::{RenderContext, TemplateEngine, VIEW_KEY};
use crate::error::ViewError;
use crate::escape::{esc, escape_html, EscapeFlags};
use crate::extension::Extensions;

use object::ViewObject;

/// Callback run before a view renders; returns the data to render with.
pub type Callback = Arc<dyn Fn(DataMap, &View) -> DataMap + Send + Sync>;

#[derive(Debug, Default)]
struct RenderState {
    rendering: HashSet<String>,
    depth: usize,
    once: HashSet<String>,
}

struct Inner {
    engine: Box<dyn TemplateEngine>,
    data: Mutex<Data>,
    assets: Mutex<Assets>,
    state: Mutex<RenderState>,
    aliases: Mutex<HashMap<String, String>>,
    exists: Mutex<HashMap<String, bool>>,
    callbacks: Mutex<HashMap<String, Vec<Callback>>>,
    extensions: Mutex<Extensions>,
}

/// Renders views by name through a template engine.
///
/// # Example
///
/// ```rust
/// use minijinja::Environment;
/// use serde_json::json;
/// use standout_view::{Assets, Data, EnvironmentEngine, View};
///
/// let mut env = Environment::new();
/// env.add_template("page.jinja", "<head>{{ view.assets() }}</head>{{ view.render('inc/footer') }}").unwrap();
/// env.add_template("inc/footer.jinja", "{{ view.asset('app.js') }}<footer>{{ year }}</footer>").unwrap();
///
/// let view = View::from_parts(EnvironmentEngine::new(env), Data::new(), Assets::new("public/", "/"));
/// view.with("year", json!(2024));
///
/// assert_eq!(
///     view.render("page", &()).unwrap(),
///     r#"<head><script src="/app.js"></script></head><footer>2024</footer>"#
/// );
/// ```
#[derive(Clone)]
pub struct View {
    inner: Arc<Inner>,
}

impl View {
    /// Creates a controller with an empty store and registry.
    pub fn new<E: TemplateEngine + 'static>(engine: E) -> Self {
        Self::from_parts(engine, Data::new(), Assets::default())
    }

    /// Creates a controller over an existing store and registry.
    pub fn from_parts<E: TemplateEngine + 'static>(engine: E, data: Data, assets: Assets) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine: Box::new(engine),
                data: Mutex::new(data),
                assets: Mutex::new(assets),
                state: Mutex::new(RenderState::default()),
                aliases: Mutex::new(HashMap::new()),
                exists: Mutex::new(HashMap::new()),
                callbacks: Mutex::new(HashMap::new()),
                extensions: Mutex::new(Extensions::new()),
            }),
        }
    }

    /// Renders `view` with `data`, which must serialize to a map (or unit).
    pub fn render<T: Serialize + ?Sized>(&self, view: &str, data: &T) -> Result<String, ViewError> {
        self.render_map(view, to_data_map(data)?)
    }

    /// Renders `view` with a ready-made data map.
    pub fn render_map(&self, view: &str, data: DataMap) -> Result<String, ViewError> {
        {
            let mut state = self.inner.state.lock();
            if state.rendering.contains(view) {
                return Err(ViewError::CircularRender(view.to_string()));
            }
            state.rendering.insert(view.to_string());
            state.depth += 1;
        }

        tracing::debug!(view, "render start");
        let result = self.render_frame(view, data);

        let outermost = {
            let mut state = self.inner.state.lock();
            state.rendering.remove(view);
            state.depth -= 1;
            if state.depth == 0 {
                state.once.clear();
            }
            state.depth == 0
        };

        if !outermost {
            return result;
        }

        let mut assets = self.inner.assets.lock();
        match result {
            Ok(content) => {
                tracing::debug!(view, "render done, flushing assets");
                Ok(assets.flush(&content))
            }
            Err(err) => {
                tracing::debug!(view, %err, "render failed, discarding asset requests");
                assets.discard_pending();
                Err(err)
            }
        }
    }

    fn render_frame(&self, view: &str, data: DataMap) -> Result<String, ViewError> {
        let callbacks = self
            .inner
            .callbacks
            .lock()
            .get(view)
            .cloned()
            .unwrap_or_default();
        let data = callbacks
            .iter()
            .fold(data, |data, callback| callback(data, self));

        if data.contains_key(VIEW_KEY) {
            return Err(ViewError::ReservedKey(VIEW_KEY.to_string()));
        }

        let context_data = {
            let mut store = self.inner.data.lock();
            store.merge(data, Scope::Shared);
            store.all(Some(view))
        };
        if context_data.contains_key(VIEW_KEY) {
            return Err(ViewError::ReservedKey(VIEW_KEY.to_string()));
        }

        let resolved = self.resolve(view);
        let context = RenderContext::new(context_data, self.clone());
        match self.inner.engine.render(&resolved, &context) {
            Err(err) if err.is_not_found() => {
                tracing::debug!(view, resolved = %resolved, "view not found, rendering empty");
                Ok(String::new())
            }
            result => result,
        }
    }

    fn resolve(&self, view: &str) -> String {
        self.inner
            .aliases
            .lock()
            .get(view)
            .cloned()
            .unwrap_or_else(|| view.to_string())
    }

    /// Registers a callback run whenever `view` is about to render.
    ///
    /// Callbacks for the same view run in registration order; each receives
    /// the data returned by the previous one.
    pub fn on<F>(&self, view: impl Into<String>, callback: F) -> &Self
    where
        F: Fn(DataMap, &View) -> DataMap + Send + Sync + 'static,
    {
        self.inner
            .callbacks
            .lock()
            .entry(view.into())
            .or_default()
            .push(Arc::new(callback));
        self
    }

    /// Makes `key` render `view`.
    ///
    /// Data and callbacks stay attached to `key`; only template lookup uses
    /// the target.
    pub fn add(&self, key: impl Into<String>, view: impl Into<String>) -> &Self {
        self.inner.aliases.lock().insert(key.into(), view.into());
        self
    }

    /// Returns true if the engine can render `view` (after alias resolution).
    ///
    /// Answers are cached per resolved name for the controller's lifetime.
    pub fn exists(&self, view: &str) -> bool {
        let resolved = self.resolve(view);
        if let Some(found) = self.inner.exists.lock().get(&resolved) {
            return *found;
        }

        let found = self.inner.engine.exists(&resolved);
        self.inner.exists.lock().insert(resolved, found);
        found
    }

    /// Returns true the first time `key` is seen during the current
    /// top-level render, false afterwards.
    pub fn once(&self, key: &str) -> bool {
        self.inner.state.lock().once.insert(key.to_string())
    }

    /// HTML-escapes `value`, quotes included.
    pub fn esc(&self, value: &str) -> String {
        esc(value)
    }

    /// HTML-escapes `value` with explicit flags.
    pub fn escape_html(&self, value: &str, flags: EscapeFlags, double_encode: bool) -> String {
        escape_html(value, flags, double_encode)
    }

    /// Sets one shared data key.
    pub fn with(&self, key: impl Into<String>, value: Value) -> &Self {
        self.inner.data.lock().set(key, value, Scope::Shared);
        self
    }

    /// Merges `data` into shared data.
    pub fn with_data(&self, data: DataMap) -> &Self {
        self.inner.data.lock().merge(data, Scope::Shared);
        self
    }

    /// Reads a shared data key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.data.lock().get(key).cloned()
    }

    /// Locks the data store.
    pub fn data(&self) -> MutexGuard<'_, Data> {
        self.inner.data.lock()
    }

    /// Locks the asset registry.
    pub fn assets(&self) -> MutexGuard<'_, Assets> {
        self.inner.assets.lock()
    }

    /// Registers an extension callable through [`View::invoke`] and as a
    /// method of the template `view` object.
    pub fn add_extension<F>(&self, name: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(&View, &[Value]) -> Result<Value, ViewError> + Send + Sync + 'static,
    {
        self.inner.extensions.lock().add(name, handler);
        self
    }

    /// Returns true if an extension is registered under `name`.
    pub fn has_extension(&self, name: &str) -> bool {
        self.inner.extensions.lock().has(name)
    }

    /// Calls the extension registered under `name`.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ViewError> {
        let handler = self
            .inner
            .extensions
            .lock()
            .get(name)
            .ok_or_else(|| ViewError::UnknownExtension(name.to_string()))?;
        handler(self, args)
    }

    /// Number of renders currently on the stack.
    pub fn depth(&self) -> usize {
        self.inner.state.lock().depth
    }

    pub(crate) fn template_object(&self) -> minijinja::Value {
        minijinja::Value::from_object(ViewObject::new(self.clone()))
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // try_lock: Debug may run while a render holds a lock.
        f.debug_struct("View")
            .field("depth", &self.inner.state.try_lock().map(|s| s.depth))
            .field("data", &self.inner.data.try_lock().map(|d| d.clone()))
            .field(
                "aliases",
                &self.inner.aliases.try_lock().map(|a| a.clone()),
            )
            .finish_non_exhaustive()
    }
}
