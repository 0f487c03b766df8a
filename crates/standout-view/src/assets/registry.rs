//! The asset registry and its deferred flush.

use std::fmt;

use super::asset::{Asset, DEFAULT_ASSET_GROUP};

/// Transforms the asset collection right before a flush renders it.
///
/// A handler can filter, reorder, merge or deduplicate assets. It receives the
/// collection already sorted by descending order; whatever it returns replaces
/// the registry's collection.
pub trait AssetsHandler: Send {
    /// Returns the assets to keep, in render order.
    fn handle(&mut self, assets: Vec<Asset>) -> Vec<Asset>;

    /// Drops any state the handler keeps between flushes.
    fn clear(&mut self) {}
}

impl<F> AssetsHandler for F
where
    F: FnMut(Vec<Asset>) -> Vec<Asset> + Send,
{
    fn handle(&mut self, assets: Vec<Asset>) -> Vec<Asset> {
        self(assets)
    }
}

/// Returns the placeholder a flush replaces with the tags of `group`.
pub fn placeholder(group: &str) -> String {
    format!("<!-- assets=\"{group}\" -->")
}

/// Collection of assets keyed by file, rendered into placeholders on flush.
///
/// Templates call [`render`](Self::render) wherever a group's tags belong and
/// get back a placeholder; the tags are produced only when
/// [`flush`](Self::flush) runs over the finished page. Assets added after the
/// placeholder was emitted (by a footer partial, say) still end up in it.
///
/// ```rust
/// use standout_view::Assets;
///
/// let mut assets = Assets::new("public/", "/");
/// let head = assets.render("default");
/// let page = format!("<head>{head}</head>");
///
/// assets.asset("app.css");
///
/// assert_eq!(
///     assets.flush(&page),
///     r#"<head><link href="/app.css" rel="stylesheet" type="text/css"></head>"#
/// );
/// ```
pub struct Assets {
    dir: String,
    uri: String,
    assets: Vec<Asset>,
    pending: Vec<String>,
    handler: Option<Box<dyn AssetsHandler>>,
}

impl fmt::Debug for Assets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assets")
            .field("dir", &self.dir)
            .field("uri", &self.uri)
            .field("assets", &self.assets)
            .field("pending", &self.pending)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl Assets {
    /// Creates an empty registry. New assets inherit `dir` and `uri`.
    pub fn new(dir: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            uri: uri.into(),
            assets: Vec::new(),
            pending: Vec::new(),
            handler: None,
        }
    }

    /// Installs a handler, builder style.
    pub fn with_handler(mut self, handler: impl AssetsHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Installs a handler, replacing any previous one.
    pub fn set_handler(&mut self, handler: impl AssetsHandler + 'static) -> &mut Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Adds an asset, replacing any asset with the same file in place.
    pub fn add(&mut self, asset: Asset) -> &mut Self {
        match self.assets.iter_mut().find(|a| a.file() == asset.file()) {
            Some(existing) => *existing = asset,
            None => self.assets.push(asset),
        }
        self
    }

    /// Returns the asset for `file`, creating it with the registry's dir and
    /// URI if it does not exist yet.
    pub fn asset(&mut self, file: &str) -> &mut Asset {
        let index = match self.assets.iter().position(|a| a.file() == file) {
            Some(index) => index,
            None => {
                let mut asset = Asset::new(file);
                asset.dir(self.dir.clone()).uri(self.uri.clone());
                self.assets.push(asset);
                self.assets.len() - 1
            }
        };
        &mut self.assets[index]
    }

    /// Returns the asset for `file` if it exists.
    pub fn get(&self, file: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.file() == file)
    }

    /// All assets, rendered or not.
    pub fn all(&self) -> &[Asset] {
        &self.assets
    }

    /// Requests `group` for the next flush and returns its placeholder.
    pub fn render(&mut self, group: &str) -> String {
        self.pending.push(group.to_string());
        placeholder(group)
    }

    /// Requests the default group.
    pub fn render_default(&mut self) -> String {
        self.render(DEFAULT_ASSET_GROUP)
    }

    /// Groups requested since the last flush, in request order.
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Replaces every requested group's placeholder in `content` with the
    /// group's tags.
    ///
    /// Assets are sorted by descending order (stable for ties) and passed
    /// through the handler first. The request list is consumed; the assets
    /// stay registered for later flushes.
    pub fn flush(&mut self, content: &str) -> String {
        self.assets
            .sort_by_key(|a| std::cmp::Reverse(a.get_order()));

        if let Some(handler) = self.handler.as_mut() {
            let handled = handler.handle(std::mem::take(&mut self.assets));
            for asset in handled {
                self.add(asset);
            }
        }

        let mut content = content.to_string();
        for group in std::mem::take(&mut self.pending) {
            let token = placeholder(&group);
            if content.contains(&token) {
                content = content.replace(&token, &self.render_group(&group));
            }
        }

        tracing::debug!(assets = self.assets.len(), "flushed asset placeholders");
        content
    }

    /// Drops requested groups without rendering them.
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }

    /// Clears the handler's state.
    pub fn clear_handler(&mut self) {
        if let Some(handler) = self.handler.as_mut() {
            handler.clear();
        }
    }

    fn render_group(&self, group: &str) -> String {
        self.assets
            .iter()
            .filter(|a| a.get_group() == group)
            .map(Asset::render)
            .collect()
    }
}
