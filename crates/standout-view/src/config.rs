//! Declarative controller setup.
//!
//! A [`ViewConfig`] describes view directories, asset locations, seed data
//! and aliases, and builds a ready [`View`] from them. It deserializes from
//! YAML or JSON:
//!
//! ```yaml
//! default_group: default
//! extension: .jinja
//! dirs:
//!   - { path: views/front, priority: 0 }
//!   - { path: views/back, priority: 10, group: default }
//! assets: { dir: public/src/, uri: "https://example.com/src/" }
//! data: { site: Example }
//! aliases: { about: pages/about }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::assets::Assets;
use crate::data::{Data, DataMap};
use crate::dirs::{Dir, Dirs, DEFAULT_GROUP};
use crate::engine::{EngineChain, FileEngine, DEFAULT_EXTENSION};
use crate::error::ViewError;
use crate::view::View;

/// One view directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirConfig {
    /// Root path.
    pub path: String,
    /// Higher is searched first.
    #[serde(default)]
    pub priority: i32,
    /// Group; the config's default group when omitted.
    #[serde(default)]
    pub group: Option<String>,
}

/// Where assets live on disk and where they are served from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssetsConfig {
    /// Directory prefix on disk.
    #[serde(default)]
    pub dir: String,
    /// Public URI prefix.
    #[serde(default)]
    pub uri: String,
}

/// Controller configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    /// Group searched by the file engine.
    #[serde(default)]
    pub default_group: Option<String>,
    /// Extension appended to view names, including the dot.
    #[serde(default)]
    pub extension: Option<String>,
    /// View directories.
    #[serde(default)]
    pub dirs: Vec<DirConfig>,
    /// Asset locations.
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Shared data seeded into the store.
    #[serde(default)]
    pub data: DataMap,
    /// View key to template name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl ViewConfig {
    /// Parses a YAML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Config`] if the YAML is malformed or does not
    /// match the expected shape.
    pub fn from_yaml(yaml: &str) -> Result<Self, ViewError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ViewError> {
        serde_json::from_str(json).map_err(|e| ViewError::Config(e.to_string()))
    }

    /// Loads a configuration file, choosing the format by extension
    /// (`.yaml`, `.yml` or `.json`).
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use standout_view::ViewConfig;
    ///
    /// let view = ViewConfig::from_file("config/views.yaml")?.build()?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ViewError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ViewError::io(path, &e))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(ViewError::Config(format!(
                "unsupported configuration format: {}",
                path.display()
            ))),
        }
    }

    /// The group searched when none is given.
    pub fn default_group(&self) -> &str {
        self.default_group.as_deref().unwrap_or(DEFAULT_GROUP)
    }

    /// Builds the directory list.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Config`] if no directory is configured or a path
    /// is empty.
    pub fn dirs(&self) -> Result<Dirs, ViewError> {
        if self.dirs.is_empty() {
            return Err(ViewError::Config("no view directories configured".into()));
        }

        let mut dirs = Dirs::new().with_default_group(self.default_group());
        for dir in &self.dirs {
            if dir.path.is_empty() {
                return Err(ViewError::Config("view directory path is empty".into()));
            }
            let group = dir.group.as_deref().unwrap_or(self.default_group());
            dirs.add(Dir::new(dir.path.as_str(), dir.priority, group));
        }
        Ok(dirs)
    }

    /// Builds a controller over a chain holding one [`FileEngine`].
    pub fn build(&self) -> Result<View, ViewError> {
        let engine = FileEngine::new(self.dirs()?)
            .with_extension(self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION));
        let view = View::from_parts(
            EngineChain::new().with_engine(engine),
            Data::with_shared(self.data.clone()),
            Assets::new(self.assets.dir.as_str(), self.assets.uri.as_str()),
        );
        for (key, target) in &self.aliases {
            view.add(key.as_str(), target.as_str());
        }

        tracing::debug!(
            dirs = self.dirs.len(),
            aliases = self.aliases.len(),
            "built view controller from configuration"
        );
        Ok(view)
    }
}
