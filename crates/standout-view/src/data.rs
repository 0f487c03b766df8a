//! Shared and per-view render data.
//!
//! [`Data`] keeps two partitions:
//!
//! - shared data, visible to every view
//! - per-view data, visible only when rendering the named view
//!
//! [`Data::all`] merges them for one view, per-view values winning on key
//! collisions. [`Data::get`] only ever reads shared data, even while a view is
//! being rendered; use [`Data::all`] to see a view's overrides.
//!
//! ```rust
//! use standout_view::{Data, Scope};
//! use serde_json::json;
//!
//! let mut data = Data::new();
//! data.set("title", json!("Home"), Scope::Shared);
//! data.set("title", json!("About"), Scope::view("about"));
//!
//! assert_eq!(data.get("title"), Some(&json!("Home")));
//! assert_eq!(data.all(Some("about"))["title"], json!("About"));
//! ```

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::ViewError;

/// String-keyed data handed to templates.
pub type DataMap = serde_json::Map<String, Value>;

/// Serializes `data` into a [`DataMap`].
///
/// Structs and maps become their fields; `()` and `None` become an empty map.
/// Anything else is a [`ViewError::Serialization`] error, since a template
/// needs named variables.
pub fn to_data_map<T: Serialize + ?Sized>(data: &T) -> Result<DataMap, ViewError> {
    match serde_json::to_value(data)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(DataMap::new()),
        other => Err(ViewError::Serialization(format!(
            "render data must serialize to a map, got `{other}`"
        ))),
    }
}

/// Where a write goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// Shared by all views.
    #[default]
    Shared,
    /// Only the named view.
    View(String),
    /// Each of the named views.
    Views(Vec<String>),
}

impl Scope {
    /// Scope for a single view.
    pub fn view(name: impl Into<String>) -> Self {
        Scope::View(name.into())
    }

    /// Scope for several views.
    pub fn views<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scope::Views(names.into_iter().map(Into::into).collect())
    }

    fn view_names(&self) -> &[String] {
        match self {
            Scope::Shared => &[],
            Scope::View(name) => std::slice::from_ref(name),
            Scope::Views(names) => names,
        }
    }
}

impl From<&str> for Scope {
    fn from(name: &str) -> Self {
        Scope::View(name.to_string())
    }
}

impl From<Option<&str>> for Scope {
    fn from(name: Option<&str>) -> Self {
        name.map_or(Scope::Shared, Scope::from)
    }
}

/// Key/value store with shared and per-view partitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data {
    shared: DataMap,
    views: HashMap<String, DataMap>,
}

impl Data {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with shared data.
    pub fn with_shared(shared: DataMap) -> Self {
        Self {
            shared,
            views: HashMap::new(),
        }
    }

    /// Sets one key in `scope`.
    pub fn set(&mut self, key: impl Into<String>, value: Value, scope: Scope) -> &mut Self {
        let key = key.into();
        match &scope {
            Scope::Shared => {
                self.shared.insert(key, value);
            }
            _ => {
                for view in scope.view_names() {
                    self.views
                        .entry(view.clone())
                        .or_default()
                        .insert(key.clone(), value.clone());
                }
            }
        }
        self
    }

    /// Shallow-merges `data` into `scope`; incoming keys overwrite existing ones.
    pub fn merge(&mut self, data: DataMap, scope: Scope) -> &mut Self {
        match &scope {
            Scope::Shared => self.shared.extend(data),
            _ => {
                for view in scope.view_names() {
                    self.views
                        .entry(view.clone())
                        .or_default()
                        .extend(data.clone());
                }
            }
        }
        self
    }

    /// Reads `key` from shared data.
    ///
    /// Per-view data is never consulted, regardless of which view is being
    /// rendered.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.shared.get(key)
    }

    /// Reads `key` from shared data, falling back to `default`.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Shared data merged with the data of `view`, the latter winning.
    pub fn all(&self, view: Option<&str>) -> DataMap {
        let mut merged = self.shared.clone();
        if let Some(own) = view.and_then(|v| self.views.get(v)) {
            merged.extend(own.clone());
        }
        merged
    }

    /// Returns a copy with keys renamed in every partition.
    ///
    /// Pairs are applied in order; keys that are absent are skipped. The
    /// receiver is left untouched.
    pub fn rename<I, K, N>(&self, pairs: I) -> Data
    where
        I: IntoIterator<Item = (K, N)>,
        K: AsRef<str>,
        N: Into<String>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(old, new)| (old.as_ref().to_string(), new.into()))
            .collect();

        let mut renamed = self.clone();
        rename_keys(&mut renamed.shared, &pairs);
        for data in renamed.views.values_mut() {
            rename_keys(data, &pairs);
        }
        renamed
    }

    /// Returns true if neither partition holds data.
    pub fn is_empty(&self) -> bool {
        self.shared.is_empty() && self.views.values().all(DataMap::is_empty)
    }
}

fn rename_keys(data: &mut DataMap, pairs: &[(String, String)]) {
    for (old, new) in pairs {
        if let Some(value) = data.remove(old) {
            data.insert(new.clone(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> DataMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_set_shared_then_get() {
        let mut data = Data::new();
        data.set("title", json!("About"), Scope::Shared);
        assert_eq!(data.get("title"), Some(&json!("About")));
    }

    #[test]
    fn test_get_ignores_view_scope() {
        let mut data = Data::new();
        data.set("title", json!("About"), Scope::view("x"));
        assert_eq!(data.get("title"), None);
        assert_eq!(data.get_or("title", json!("default")), json!("default"));
    }

    #[test]
    fn test_all_merges_view_over_shared() {
        let mut data = Data::new();
        data.set("a", json!(1), Scope::Shared);
        data.set("b", json!(2), Scope::view("x"));

        assert_eq!(data.all(Some("x")), map(json!({"a": 1, "b": 2})));
        assert_eq!(data.all(None), map(json!({"a": 1})));
        assert_eq!(data.all(Some("unknown")), map(json!({"a": 1})));
    }

    #[test]
    fn test_view_value_wins_on_collision() {
        let mut data = Data::new();
        data.set("title", json!("shared"), Scope::Shared);
        data.set("title", json!("own"), Scope::view("about"));
        assert_eq!(data.all(Some("about"))["title"], json!("own"));
    }

    #[test]
    fn test_set_multiple_views() {
        let mut data = Data::new();
        data.set("nav", json!(true), Scope::views(["home", "about"]));

        assert_eq!(data.all(Some("home"))["nav"], json!(true));
        assert_eq!(data.all(Some("about"))["nav"], json!(true));
        assert!(data.all(Some("contact")).get("nav").is_none());
    }

    #[test]
    fn test_merge_is_shallow_and_overwrites() {
        let mut data = Data::new();
        data.merge(map(json!({"user": {"name": "a", "role": "x"}, "n": 1})), Scope::view("v"));
        data.merge(map(json!({"user": {"name": "b"}})), Scope::view("v"));

        let all = data.all(Some("v"));
        assert_eq!(all["user"], json!({"name": "b"}));
        assert_eq!(all["n"], json!(1));
    }

    #[test]
    fn test_merge_shared() {
        let mut data = Data::new();
        data.set("title", json!("About us"), Scope::Shared);
        data.merge(map(json!({"title": "About"})), Scope::Shared);
        assert_eq!(data.get("title"), Some(&json!("About")));
    }

    #[test]
    fn test_rename_does_not_mutate_original() {
        let mut data = Data::new();
        data.set("a", json!(1), Scope::Shared);
        data.set("a", json!(2), Scope::view("x"));

        let renamed = data.rename([("a", "a2")]);

        assert!(data.all(None).contains_key("a"));
        assert!(!renamed.all(None).contains_key("a"));
        assert_eq!(renamed.all(None)["a2"], json!(1));
        assert_eq!(renamed.all(Some("x"))["a2"], json!(2));
    }

    #[test]
    fn test_rename_missing_key_is_noop() {
        let mut data = Data::new();
        data.set("a", json!(1), Scope::Shared);
        let renamed = data.rename([("missing", "other")]);
        assert_eq!(renamed, data);
    }

    #[test]
    fn test_to_data_map() {
        #[derive(Serialize)]
        struct Page {
            title: &'static str,
        }

        assert_eq!(to_data_map(&Page { title: "About" }).unwrap()["title"], json!("About"));
        assert!(to_data_map(&()).unwrap().is_empty());
        assert!(to_data_map(&Option::<u8>::None).unwrap().is_empty());
        assert!(matches!(to_data_map(&[1, 2]), Err(ViewError::Serialization(_))));
    }

    #[test]
    fn test_scope_from_option() {
        assert_eq!(Scope::from(None), Scope::Shared);
        assert_eq!(Scope::from(Some("about")), Scope::view("about"));
    }
}
