//! File-based template engine.
//!
//! [`FileEngine`] looks views up in a [`Dirs`] list: for every directory in
//! priority order it tries `dir + view + extension` and renders the first
//! existing file with MiniJinja. Files are read on each render, so edits show
//! up without a restart.
//!
//! # Example
//!
//! ```rust,ignore
//! use standout_view::{Dirs, FileEngine, View};
//!
//! let dirs = Dirs::new()
//!     .dir("views/front", 0, "default")
//!     .dir("views/theme", 10, "default");
//!
//! // views/theme/about.jinja wins over views/front/about.jinja
//! let view = View::new(FileEngine::new(dirs));
//! let html = view.render("about", &serde_json::json!({"title": "About"}))?;
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use minijinja::Environment;
use parking_lot::Mutex;

use super::filters::register_filters;
use super::{RenderContext, TemplateEngine, DEFAULT_EXTENSION};
use crate::dirs::Dirs;
use crate::error::ViewError;

/// Renders view files found in prioritized directories.
///
/// # Failure Isolation
///
/// Each render produces its output into a fresh string. If the template fails
/// with anything but a missing view, nothing of its partial output is
/// returned. A [`ViewError::ViewNotFound`] raised from inside the template
/// (e.g. by an extension) collapses the template to empty content instead.
pub struct FileEngine {
    dirs: Dirs,
    group: Option<String>,
    extension: String,
    env: Environment<'static>,
    exists: Mutex<HashMap<String, bool>>,
}

impl std::fmt::Debug for FileEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileEngine")
            .field("dirs", &self.dirs)
            .field("group", &self.group)
            .field("extension", &self.extension)
            .finish()
    }
}

impl FileEngine {
    /// Creates an engine searching the default group of `dirs` for `.jinja`
    /// files.
    pub fn new(dirs: Dirs) -> Self {
        let mut env = Environment::new();
        register_filters(&mut env);
        Self {
            dirs,
            group: None,
            extension: DEFAULT_EXTENSION.to_string(),
            env,
            exists: Mutex::new(HashMap::new()),
        }
    }

    /// Sets the file extension appended to view names, including the dot.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Searches `group` instead of the list's default group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// The directories searched.
    pub fn dirs(&self) -> &Dirs {
        &self.dirs
    }

    /// The extension appended to view names.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The MiniJinja environment used to evaluate view files.
    ///
    /// Use this to register custom filters, functions or globals.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Returns the path `view` resolves to, if any.
    pub fn locate(&self, view: &str) -> Option<PathBuf> {
        self.dirs
            .locate_in(self.group.as_deref(), &self.file_name(view))
    }

    fn file_name(&self, view: &str) -> String {
        format!("{}{}", view, self.extension)
    }
}

impl TemplateEngine for FileEngine {
    fn render(&self, view: &str, context: &RenderContext) -> Result<String, ViewError> {
        let Some(path) = self.locate(view) else {
            return Err(context.not_found(view));
        };

        let source = fs::read_to_string(&path).map_err(|e| ViewError::io(&path, &e))?;
        tracing::debug!(view, path = %path.display(), "rendering view file");

        match self
            .env
            .render_named_str(&self.file_name(view), &source, context.template_value())
        {
            Ok(content) => Ok(content),
            Err(err) => match ViewError::from_template_error(err) {
                err if err.is_not_found() => {
                    tracing::debug!(view, %err, "sub-view not found, rendering view as empty");
                    Ok(String::new())
                }
                err => Err(err),
            },
        }
    }

    fn exists(&self, view: &str) -> bool {
        if let Some(found) = self.exists.lock().get(view) {
            return *found;
        }

        let found = self.locate(view).is_some();
        self.exists.lock().insert(view.to_string(), found);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::View;
    use serde_json::json;
    use std::fs;

    fn setup() -> (tempfile::TempDir, Dirs) {
        let tmp = tempfile::tempdir().unwrap();
        let front = tmp.path().join("front");
        fs::create_dir_all(front.join("inc")).unwrap();
        fs::write(front.join("about.jinja"), "<title>{{ title }}</title>").unwrap();
        fs::write(front.join("inc/footer.jinja"), "<footer>Footer</footer>").unwrap();
        fs::write(front.join("broken.jinja"), "{{ unclosed").unwrap();
        let dirs = Dirs::new().dir(front.to_string_lossy(), 0, "default");
        (tmp, dirs)
    }

    fn context(data: serde_json::Value, engine: FileEngine) -> RenderContext {
        let serde_json::Value::Object(map) = data else {
            panic!("expected object");
        };
        RenderContext::new(map, View::new(engine))
    }

    #[test]
    fn test_render_binds_data() {
        let (_tmp, dirs) = setup();
        let engine = FileEngine::new(dirs.clone());
        let ctx = context(json!({"title": "About"}), FileEngine::new(dirs));

        assert_eq!(engine.render("about", &ctx).unwrap(), "<title>About</title>");
    }

    #[test]
    fn test_render_missing_is_not_found() {
        let (_tmp, dirs) = setup();
        let engine = FileEngine::new(dirs.clone());
        let ctx = context(json!({"a": 1}), FileEngine::new(dirs));

        match engine.render("missing", &ctx) {
            Err(ViewError::ViewNotFound { view, data }) => {
                assert_eq!(view, "missing");
                assert_eq!(data["a"], json!(1));
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn test_render_syntax_error_propagates() {
        let (_tmp, dirs) = setup();
        let engine = FileEngine::new(dirs.clone());
        let ctx = context(json!({}), FileEngine::new(dirs));

        assert!(matches!(
            engine.render("broken", &ctx),
            Err(ViewError::Template(_))
        ));
    }

    #[test]
    fn test_traversal_is_not_found() {
        let (tmp, dirs) = setup();
        fs::write(tmp.path().join("secret.jinja"), "secret").unwrap();
        let engine = FileEngine::new(dirs.clone());
        let ctx = context(json!({}), FileEngine::new(dirs));

        assert!(engine.render("../secret", &ctx).unwrap_err().is_not_found());
        assert!(!engine.exists("../secret"));
    }

    #[test]
    fn test_exists_is_memoized() {
        let (tmp, dirs) = setup();
        let engine = FileEngine::new(dirs);

        assert!(engine.exists("about"));
        assert!(engine.exists("inc/footer"));
        assert!(!engine.exists("inc/foo"));

        // Once answered, the result sticks even if the file appears later.
        fs::write(tmp.path().join("front/inc/foo.jinja"), "foo").unwrap();
        assert!(!engine.exists("inc/foo"));
        assert!(FileEngine::new(engine.dirs().clone()).exists("inc/foo"));
    }

    #[test]
    fn test_custom_extension_and_group() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("welcome.txt"), "Hi {{ name }}").unwrap();
        let dirs = Dirs::new()
            .dir(tmp.path().to_string_lossy(), 0, "mail");

        let engine = FileEngine::new(dirs.clone())
            .with_extension(".txt")
            .with_group("mail");
        let ctx = context(json!({"name": "Ada"}), FileEngine::new(dirs.clone()));

        assert_eq!(engine.render("welcome", &ctx).unwrap(), "Hi Ada");
        assert!(!FileEngine::new(dirs).with_extension(".txt").exists("welcome"));
    }
}
