//! HTML attribute collections.
//!
//! [`Attributes`] is an ordered collection of attribute entries rendered into
//! HTML attribute syntax. An entry is either positional (a bare, boolean-style
//! attribute such as `defer`) or named:
//!
//! | Entry | Output |
//! |-------|--------|
//! | positional `"defer"` | `defer` |
//! | `async` → `null` | `async` |
//! | `data-cfg` → `[1, 2]` | `data-cfg='[1,2]'` |
//! | `id` → `"main"` | `id="main"` |
//!
//! [`Attributes::render`] escapes every name and value; it is what asset tags
//! use. [`TagAttributes`] is the builder-facing variant for hand-written tags:
//! repeated [`add`](TagAttributes::add) calls accumulate values into a list, a
//! `class` list renders space-separated, and output is not escaped.
//!
//! ```rust
//! use standout_view::Attributes;
//! use serde_json::json;
//!
//! let mut attrs = Attributes::new();
//! attrs.flag("defer").set("data-id", json!("a\"b"));
//! assert_eq!(attrs.render(), r#"defer data-id="a&quot;b""#);
//! ```

use std::collections::HashMap;

use serde_json::Value;

use crate::escape::esc;

/// Key of an attribute entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrKey {
    /// Positional entry rendered as its bare value.
    Index(usize),
    /// Named entry.
    Name(String),
}

/// An ordered collection of HTML attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(AttrKey, Value)>,
    next_index: usize,
}

impl Attributes {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a named attribute, replacing an existing value in place.
    ///
    /// A `null` value renders as the bare attribute name.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        let key = AttrKey::Name(name.into());
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Appends a positional attribute rendered as its bare value.
    pub fn flag(&mut self, value: impl Into<String>) -> &mut Self {
        self.entries
            .push((AttrKey::Index(self.next_index), Value::String(value.into())));
        self.next_index += 1;
        self
    }

    /// Returns the value of a named attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find_map(|(k, v)| match k {
            AttrKey::Name(n) if n == name => Some(v),
            _ => None,
        })
    }

    /// Returns true if a named attribute exists.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders all entries with names and values HTML-escaped.
    pub fn render(&self) -> String {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| match (key, value) {
                (AttrKey::Index(_), value) => esc(&value_to_string(value)),
                (AttrKey::Name(name), Value::Null) => esc(name),
                (AttrKey::Name(name), Value::Array(_) | Value::Object(_)) => {
                    format!("{}='{}'", esc(name), esc(&value.to_string()))
                }
                (AttrKey::Name(name), value) => {
                    format!("{}=\"{}\"", esc(name), esc(&value_to_string(value)))
                }
            })
            .collect();
        parts.join(" ")
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.set(name, value);
        }
        attrs
    }
}

/// Converts a scalar value to its attribute text.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Attributes for a hand-written tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagAttributes {
    attributes: Attributes,
}

impl TagAttributes {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Returns true if `name` is set.
    pub fn has(&self, name: &str) -> bool {
        self.attributes.has(name)
    }

    /// Returns the value of `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sets `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.attributes.set(name, value);
        self
    }

    /// Sets `name`, or appends to it if it already exists.
    ///
    /// Existing and new values are both turned into lists and concatenated, so
    /// `add("class", "a")` followed by `add("class", "b")` yields `["a", "b"]`.
    pub fn add(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        let name = name.into();
        let merged = match self.attributes.get(&name) {
            Some(existing) => {
                let mut list = into_list(existing.clone());
                list.extend(into_list(value));
                Value::Array(list)
            }
            None => value,
        };
        self.attributes.set(name, merged);
        self
    }

    /// Calls [`add`](Self::add) for every entry.
    pub fn merge<K: Into<String>>(&mut self, attributes: impl IntoIterator<Item = (K, Value)>) -> &mut Self {
        for (name, value) in attributes {
            self.add(name, value);
        }
        self
    }

    /// The underlying collection.
    pub fn all(&self) -> &Attributes {
        &self.attributes
    }

    /// Renders the attributes without escaping.
    ///
    /// A `class` list renders as its unique values joined by spaces; other
    /// lists render as single-quoted JSON.
    pub fn render(&self) -> String {
        let parts: Vec<String> = self
            .attributes
            .iter()
            .map(|(key, value)| match (key, value) {
                (AttrKey::Index(_), value) => value_to_string(value),
                (AttrKey::Name(name), Value::Null) => name.clone(),
                (AttrKey::Name(name), Value::Array(items)) if name == "class" => {
                    let mut classes: Vec<String> = Vec::new();
                    for class in items.iter().map(value_to_string) {
                        if !classes.contains(&class) {
                            classes.push(class);
                        }
                    }
                    format!("{}=\"{}\"", name, classes.join(" "))
                }
                (AttrKey::Name(name), Value::Array(_) | Value::Object(_)) => {
                    format!("{}='{}'", name, value)
                }
                (AttrKey::Name(name), value) => format!("{}=\"{}\"", name, value_to_string(value)),
            })
            .collect();
        parts.join(" ")
    }
}

impl std::fmt::Display for TagAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Per-tag attribute sets, created on first access.
#[derive(Debug, Clone, Default)]
pub struct TagsAttributes {
    tags: HashMap<String, TagAttributes>,
}

impl TagsAttributes {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if attributes exist for `tag`.
    pub fn has(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Returns the attributes for `tag`, creating an empty set if needed.
    pub fn get(&mut self, tag: &str) -> &mut TagAttributes {
        self.tags.entry(tag.to_string()).or_default()
    }

    /// Replaces the attributes for `tag`.
    pub fn set(&mut self, tag: impl Into<String>, attributes: TagAttributes) -> &mut Self {
        self.tags.insert(tag.into(), attributes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_empty() {
        assert_eq!(Attributes::new().render(), "");
    }

    #[test]
    fn test_render_kinds() {
        let mut attrs = Attributes::new();
        attrs
            .flag("defer")
            .set("async", Value::Null)
            .set("data-cfg", json!([1, "a"]))
            .set("id", json!("main"))
            .set("tabindex", json!(2));

        assert_eq!(
            attrs.render(),
            r#"defer async data-cfg='[1,&quot;a&quot;]' id="main" tabindex="2""#
        );
    }

    #[test]
    fn test_render_escapes_names_and_values() {
        let mut attrs = Attributes::new();
        attrs.flag("<x>").set("title", json!("a & b"));
        assert_eq!(attrs.render(), r#"&lt;x&gt; title="a &amp; b""#);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut attrs = Attributes::new();
        attrs.set("a", json!("1")).set("b", json!("2")).set("a", json!("3"));
        assert_eq!(attrs.render(), r#"a="3" b="2""#);
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_bool_values() {
        let attrs: Attributes = [("on", json!(true)), ("off", json!(false))].into_iter().collect();
        assert_eq!(attrs.render(), r#"on="1" off="""#);
    }

    #[test]
    fn test_tag_attributes_add_accumulates() {
        let mut attrs = TagAttributes::new();
        attrs.add("class", json!("a")).add("class", json!(["b", "a"]));
        assert_eq!(attrs.get("class"), Some(&json!(["a", "b", "a"])));
        assert_eq!(attrs.render(), r#"class="a b""#);
    }

    #[test]
    fn test_tag_attributes_render_unescaped() {
        let mut attrs = TagAttributes::new();
        attrs
            .set("data-x", json!({"k": "v"}))
            .set("title", json!("<b>"))
            .set("hidden", Value::Null);
        assert_eq!(attrs.to_string(), r#"data-x='{"k":"v"}' title="<b>" hidden"#);
    }

    #[test]
    fn test_tag_attributes_merge() {
        let mut attrs = TagAttributes::new();
        attrs.set("id", json!("a"));
        attrs.merge([("id", json!("b")), ("lang", json!("en"))]);
        assert_eq!(attrs.get("id"), Some(&json!(["a", "b"])));
        assert!(attrs.has("lang"));
    }

    #[test]
    fn test_tags_attributes_get_or_create() {
        let mut tags = TagsAttributes::new();
        assert!(!tags.has("body"));
        tags.get("body").add("class", json!("dark"));
        assert!(tags.has("body"));
        assert_eq!(tags.get("body").render(), r#"class="dark""#);
    }
}
