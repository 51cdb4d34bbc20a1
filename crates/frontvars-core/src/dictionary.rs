//! Per-document variable dictionaries.
//!
//! A dictionary is derived from a document's frontmatter on every call and
//! never cached, so edits to the frontmatter take effect on the next pass.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Reserved key that enables substitution for a document.
pub const GATE_KEY: &str = "use-var";

/// Keys starting with this marker are never copied into a dictionary.
pub const RESERVED_PREFIX: char = '_';

/// Host-managed key that is never copied into a dictionary.
pub const POSITION_KEY: &str = "position";

/// Raw frontmatter mapping as provided by the host metadata cache.
pub type Frontmatter = Map<String, Value>;

/// Host metadata cache.
///
/// Returns `None` when the document does not exist, has no active view,
/// has no cached metadata or has no frontmatter block.
pub trait MetadataCache {
    /// Frontmatter for a document.
    fn frontmatter(&self, document_id: &str) -> Option<Frontmatter>;
}

impl<C: MetadataCache + ?Sized> MetadataCache for &C {
    fn frontmatter(&self, document_id: &str) -> Option<Frontmatter> {
        (**self).frontmatter(document_id)
    }
}

/// Capability to look up the dictionary for a document.
///
/// Gating is not applied here; callers check [`Dictionary::is_enabled`].
pub trait DictionaryResolver {
    /// Dictionary for a document, or `None` on a lookup miss.
    fn resolve(&self, document_id: &str) -> Option<Dictionary>;
}

impl<R: DictionaryResolver + ?Sized> DictionaryResolver for &R {
    fn resolve(&self, document_id: &str) -> Option<Dictionary> {
        (**self).resolve(document_id)
    }
}

/// Resolves dictionaries from a host metadata cache.
#[derive(Debug, Clone, Default)]
pub struct FrontmatterResolver<C> {
    cache: C,
}

impl<C: MetadataCache> FrontmatterResolver<C> {
    /// Create a resolver over the given cache.
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<C: MetadataCache> DictionaryResolver for FrontmatterResolver<C> {
    fn resolve(&self, document_id: &str) -> Option<Dictionary> {
        let frontmatter = self.cache.frontmatter(document_id)?;
        Some(Dictionary::from_frontmatter(frontmatter))
    }
}

/// Variables available to one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: BTreeMap<String, Value>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy every frontmatter key except reserved (`_`-prefixed) keys and
    /// `position`. The gate key is kept.
    pub fn from_frontmatter(frontmatter: Frontmatter) -> Self {
        let entries = frontmatter
            .into_iter()
            .filter(|(key, _)| !key.starts_with(RESERVED_PREFIX) && key != POSITION_KEY)
            .collect();
        Self { entries }
    }

    /// Builder: insert a variable.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Raw value of a variable.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Value of a variable rendered as display text.
    pub fn display_value(&self, name: &str) -> Option<String> {
        self.get(name).map(stringify_value)
    }

    /// Whether substitution is enabled for this document.
    ///
    /// Only boolean `true` or the exact string `"true"` enable it; values
    /// such as `1` or `"yes"` do not.
    pub fn is_enabled(&self) -> bool {
        matches!(self.get(GATE_KEY), Some(Value::Bool(true)))
            || matches!(self.get(GATE_KEY), Some(Value::String(s)) if s == "true")
    }

    /// Number of entries, including the gate key.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Render a frontmatter value as display text.
///
/// Strings are verbatim, `null` is empty and sequences are comma-joined.
/// Mappings are shown as compact JSON.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(stringify_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct MapCache(HashMap<String, Frontmatter>);

    impl MetadataCache for MapCache {
        fn frontmatter(&self, document_id: &str) -> Option<Frontmatter> {
            self.0.get(document_id).cloned()
        }
    }

    fn frontmatter(value: Value) -> Frontmatter {
        match value {
            Value::Object(map) => map,
            _ => panic!("frontmatter must be an object"),
        }
    }

    #[test]
    fn test_from_frontmatter_filters_reserved_keys() {
        let dict = Dictionary::from_frontmatter(frontmatter(json!({
            "use-var": true,
            "name": "Alice",
            "_hidden": "x",
            "position": { "start": 0 },
        })));

        assert_eq!(dict.len(), 2);
        assert!(dict.get("name").is_some());
        assert!(dict.get(GATE_KEY).is_some());
        assert!(dict.get("_hidden").is_none());
        assert!(dict.get("position").is_none());
    }

    #[test]
    fn test_gate_exact_equality() {
        assert!(Dictionary::new().with(GATE_KEY, true).is_enabled());
        assert!(Dictionary::new().with(GATE_KEY, "true").is_enabled());
        assert!(!Dictionary::new().with(GATE_KEY, false).is_enabled());
        assert!(!Dictionary::new().with(GATE_KEY, 1).is_enabled());
        assert!(!Dictionary::new().with(GATE_KEY, "yes").is_enabled());
        assert!(!Dictionary::new().with(GATE_KEY, "True").is_enabled());
        assert!(!Dictionary::new().with("name", "Alice").is_enabled());
    }

    #[test]
    fn test_stringify_value() {
        assert_eq!(stringify_value(&json!("Alice")), "Alice");
        assert_eq!(stringify_value(&json!(42)), "42");
        assert_eq!(stringify_value(&json!(1.5)), "1.5");
        assert_eq!(stringify_value(&json!(false)), "false");
        assert_eq!(stringify_value(&json!(null)), "");
        assert_eq!(stringify_value(&json!(["a", 1, true])), "a,1,true");
        assert_eq!(stringify_value(&json!({"k": 1})), r#"{"k":1}"#);
    }

    #[test]
    fn test_resolver_lookup_miss() {
        let resolver = FrontmatterResolver::new(MapCache(HashMap::new()));
        assert!(resolver.resolve("missing.md").is_none());
    }

    #[test]
    fn test_resolver_returns_ungated_dictionary() {
        let mut docs = HashMap::new();
        docs.insert("a.md".to_string(), frontmatter(json!({ "name": "Bob" })));
        let resolver = FrontmatterResolver::new(MapCache(docs));

        let dict = resolver.resolve("a.md").unwrap();
        assert_eq!(dict.display_value("name").as_deref(), Some("Bob"));
        assert!(!dict.is_enabled());
    }
}
