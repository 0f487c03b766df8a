//! # Standout View - Server-Side View Rendering
//!
//! `standout-view` renders named views with MiniJinja templates found in
//! prioritized directories. It also collects the CSS and JavaScript assets
//! those views need.
//!
//! ## Core Concepts
//!
//! - [`View`]: The controller. Renders views by name, runs per-view callbacks,
//!   resolves aliases and flushes assets once the outermost render is done
//! - [`Dirs`]: Prioritized, grouped template directories
//! - [`Data`]: Shared and per-view render data
//! - [`Assets`]: Asset registry rendered through deferred placeholders
//! - [`TemplateEngine`]: The seam for template dialects, with [`FileEngine`],
//!   [`EnvironmentEngine`] and [`EngineChain`] built in
//! - [`ViewConfig`]: YAML/JSON setup for all of the above
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use standout_view::{Dirs, FileEngine, View};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct About { title: String }
//!
//! // views/theme overrides views/front
//! let dirs = Dirs::new()
//!     .dir("views/front", 0, "default")
//!     .dir("views/theme", 10, "default");
//!
//! let view = View::new(FileEngine::new(dirs));
//! let html = view.render("about", &About { title: "About".into() })?;
//! ```
//!
//! ## Templates
//!
//! Inside a template, data keys are variables and `view` is the controller:
//!
//! ```rust
//! use minijinja::Environment;
//! use standout_view::{EnvironmentEngine, View};
//!
//! let mut env = Environment::new();
//! env.add_template("about.jinja", "<h1>{{ title }}</h1>{{ view.render('inc/footer') }}").unwrap();
//! env.add_template("inc/footer.jinja", "<footer>{{ view.esc(site) }}</footer>").unwrap();
//!
//! let view = View::new(EnvironmentEngine::new(env));
//! view.with("site", serde_json::json!("Tom & Jerry"));
//!
//! let html = view.render("about", &serde_json::json!({"title": "About"})).unwrap();
//! assert_eq!(html, "<h1>About</h1><footer>Tom &amp; Jerry</footer>");
//! ```
//!
//! A view that no engine can find renders as an empty string, so optional
//! partials need no guard. Use `view.exists(name)` to branch on them anyway.
//!
//! ## Assets
//!
//! `view.assets(group)` emits a placeholder; `view.asset(file, ...)` registers
//! a file. Tags replace the placeholders after the whole page has rendered,
//! so partials rendered late can still add to the page head:
//!
//! ```rust
//! use minijinja::Environment;
//! use standout_view::{Assets, Data, EnvironmentEngine, View};
//!
//! let mut env = Environment::new();
//! env.add_template("page.jinja", "<head>{{ view.assets() }}</head>{{ view.render('widget') }}").unwrap();
//! env.add_template("widget.jinja", "{{ view.asset('widget.css', order=10) }}<div></div>").unwrap();
//!
//! let view = View::from_parts(EnvironmentEngine::new(env), Data::new(), Assets::new("", "/src/"));
//! assert_eq!(
//!     view.render("page", &()).unwrap(),
//!     r#"<head><link href="/src/widget.css" rel="stylesheet" type="text/css"></head><div></div>"#
//! );
//! ```

// Internal modules
pub mod assets;
pub mod attributes;
pub mod config;
pub mod data;
pub mod dirs;
pub mod engine;
mod error;
pub mod escape;
pub mod extension;
pub mod view;

// Error type
pub use error::ViewError;

// Directory exports
pub use dirs::{Dir, Dirs, DEFAULT_GROUP};

// Data exports
pub use data::{to_data_map, Data, DataMap, Scope};

// Asset exports
pub use assets::{placeholder, Asset, Assets, AssetsHandler, DEFAULT_ASSET_GROUP};

// Attribute exports
pub use attributes::{AttrKey, Attributes, TagAttributes, TagsAttributes};

// Escaping exports
pub use escape::{esc, escape_html, EscapeFlags};

// Engine exports
pub use engine::{
    filters::register_filters, EngineChain, EnvironmentEngine, FileEngine, RenderContext,
    TemplateEngine, DEFAULT_EXTENSION, VIEW_KEY,
};

// Controller exports
pub use config::{AssetsConfig, DirConfig, ViewConfig};
pub use extension::{ExtensionFn, Extensions};
pub use view::{Callback, View};
