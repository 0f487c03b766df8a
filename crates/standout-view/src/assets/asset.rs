//! A single CSS or JavaScript asset.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::attributes::Attributes;
use crate::escape::esc;

/// The group an asset belongs to unless told otherwise.
pub const DEFAULT_ASSET_GROUP: &str = "default";

/// Describes one asset file and how its tag is rendered.
///
/// The tag's `href`/`src` is `uri + file` with no slash normalization, so the
/// URI should end with `/` and the file should not start with one.
///
/// ```rust
/// use standout_view::Asset;
/// use serde_json::Value;
///
/// let mut asset = Asset::new("js/app.js");
/// asset.uri("https://example.com/").attr("defer", Value::Null);
///
/// assert_eq!(
///     asset.render(),
///     r#"<script src="https://example.com/js/app.js" defer></script>"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    file: String,
    dir: String,
    uri: String,
    attributes: Attributes,
    order: i32,
    group: String,
}

impl Asset {
    /// Creates an asset with no dir, no URI and default settings.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            dir: String::new(),
            uri: String::new(),
            attributes: Attributes::new(),
            order: 0,
            group: DEFAULT_ASSET_GROUP.to_string(),
        }
    }

    /// The file, also the asset's identity.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Sets the directory the file lives in on disk.
    pub fn dir(&mut self, dir: impl Into<String>) -> &mut Self {
        self.dir = dir.into();
        self
    }

    /// The directory the file lives in on disk.
    pub fn get_dir(&self) -> &str {
        &self.dir
    }

    /// Sets the public URI prefix.
    pub fn uri(&mut self, uri: impl Into<String>) -> &mut Self {
        self.uri = uri.into();
        self
    }

    /// The public URI prefix.
    pub fn get_uri(&self) -> &str {
        &self.uri
    }

    /// Sets a named attribute. A `null` value renders as the bare name.
    pub fn attr(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.attributes.set(name, value);
        self
    }

    /// Appends a bare attribute.
    pub fn flag(&mut self, value: impl Into<String>) -> &mut Self {
        self.attributes.flag(value);
        self
    }

    /// The attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Sets the group.
    pub fn group(&mut self, group: impl Into<String>) -> &mut Self {
        self.group = group.into();
        self
    }

    /// The group.
    pub fn get_group(&self) -> &str {
        &self.group
    }

    /// Sets the order. Higher renders first.
    pub fn order(&mut self, order: i32) -> &mut Self {
        self.order = order;
        self
    }

    /// The order.
    pub fn get_order(&self) -> i32 {
        self.order
    }

    /// The file's location on disk, `dir + file`.
    pub fn path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.dir, self.file))
    }

    /// Renders the tag: `<link>` for `.css`, `<script>` for `.js`, nothing
    /// for any other extension.
    pub fn render(&self) -> String {
        let src = esc(&format!("{}{}", self.uri, self.file));
        let attributes = match self.attributes.render() {
            rendered if rendered.is_empty() => rendered,
            rendered => format!(" {rendered}"),
        };

        let path = self.path();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("css") => format!(
                r#"<link href="{src}" rel="stylesheet" type="text/css"{attributes}>"#
            ),
            Some("js") => format!(r#"<script src="{src}"{attributes}></script>"#),
            _ => String::new(),
        }
    }

    /// Returns true if the extension is one that renders a tag.
    pub fn is_renderable(&self) -> bool {
        matches!(
            Path::new(&self.file).extension().and_then(|ext| ext.to_str()),
            Some("css") | Some("js")
        )
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
