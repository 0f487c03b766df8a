//! Engine over a caller-configured MiniJinja environment.

use std::fs;

use minijinja::{Environment, ErrorKind};

use super::filters::register_filters;
use super::{RenderContext, TemplateEngine, DEFAULT_EXTENSION};
use crate::dirs::Dirs;
use crate::error::ViewError;

/// Renders views through a `minijinja::Environment`.
///
/// Use this when templates come from somewhere other than plain files, such as
/// sources embedded in the binary, or when the environment needs a custom
/// setup (syntax, globals, undefined behavior). The view name plus the
/// extension is used as the template name.
///
/// A template that is missing, or that includes a missing template, is
/// reported as [`ViewError::ViewNotFound`] for the requested view.
///
/// ```rust
/// use minijinja::Environment;
/// use standout_view::{EnvironmentEngine, View};
///
/// let mut env = Environment::new();
/// env.add_template("hello.jinja", "Hello {{ name }}").unwrap();
///
/// let view = View::new(EnvironmentEngine::new(env));
/// let out = view.render("hello", &serde_json::json!({"name": "World"})).unwrap();
/// assert_eq!(out, "Hello World");
/// ```
pub struct EnvironmentEngine {
    env: Environment<'static>,
    extension: String,
}

impl std::fmt::Debug for EnvironmentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentEngine")
            .field("extension", &self.extension)
            .finish()
    }
}

impl EnvironmentEngine {
    /// Wraps an environment as is.
    pub fn new(env: Environment<'static>) -> Self {
        Self {
            env,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Builds an environment whose loader searches `dirs`.
    ///
    /// Template names resolve through [`Dirs::locate`], so includes obey the
    /// same priority order and containment rules as top-level views.
    pub fn from_dirs(dirs: Dirs) -> Self {
        let mut env = Environment::new();
        register_filters(&mut env);
        env.set_loader(move |name| {
            let Some(path) = dirs.locate(name) else {
                tracing::trace!(name, "template not found in any directory");
                return Ok(None);
            };
            fs::read_to_string(&path).map(Some).map_err(|e| {
                minijinja::Error::new(
                    ErrorKind::InvalidOperation,
                    format!("could not read template {}", path.display()),
                )
                .with_source(ViewError::io(&path, &e))
            })
        });
        Self::new(env)
    }

    /// Sets the extension appended to view names, including the dot.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// The wrapped environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// The wrapped environment, for registering filters, functions or
    /// templates.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    fn template_name(&self, view: &str) -> String {
        format!("{}{}", view, self.extension)
    }
}

impl TemplateEngine for EnvironmentEngine {
    fn render(&self, view: &str, context: &RenderContext) -> Result<String, ViewError> {
        let name = self.template_name(view);
        let template = match self.env.get_template(&name) {
            Ok(template) => template,
            Err(err) if err.kind() == ErrorKind::TemplateNotFound => {
                return Err(context.not_found(view));
            }
            Err(err) => return Err(ViewError::from_template_error(err)),
        };

        tracing::debug!(view, template = %name, "rendering environment template");
        template
            .render(context.template_value())
            .map_err(|err| match ViewError::from_template_error(err) {
                err if err.is_not_found() => context.not_found(view),
                err => err,
            })
    }

    fn exists(&self, view: &str) -> bool {
        self.env.get_template(&self.template_name(view)).is_ok()
    }
}
