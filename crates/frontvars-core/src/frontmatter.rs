//! YAML frontmatter extraction and an in-memory metadata cache.

use crate::dictionary::{Frontmatter, MetadataCache};
use crate::{FrontvarsError, Result};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

const FENCE: &str = "---";
const CLOSING_FENCES: [&str; 2] = ["---", "..."];

/// Extract the leading frontmatter block of a markdown document.
///
/// Returns `Ok(None)` when the document has no frontmatter block. An empty
/// block yields an empty mapping.
///
/// # Example
///
/// ```
/// use frontvars_core::frontmatter::parse_frontmatter;
///
/// let fm = parse_frontmatter("---\nname: Alice\n---\nHi {name}").unwrap().unwrap();
/// assert_eq!(fm["name"], "Alice");
/// ```
pub fn parse_frontmatter(text: &str) -> Result<Option<Frontmatter>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    if lines.next().map(str::trim_end) != Some(FENCE) {
        return Ok(None);
    }

    let mut body = Vec::new();
    let mut closed = false;
    for line in lines {
        if CLOSING_FENCES.contains(&line.trim_end()) {
            closed = true;
            break;
        }
        body.push(line);
    }
    if !closed {
        return Ok(None);
    }

    let body = body.join("\n");
    if body.trim().is_empty() {
        return Ok(Some(Frontmatter::new()));
    }

    match serde_yaml_ng::from_str::<Value>(&body)? {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(Some(Frontmatter::new())),
        other => Err(FrontvarsError::Frontmatter(format!(
            "expected a mapping, found {}",
            kind_name(&other)
        ))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// A metadata cache holding frontmatter per document id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadataCache {
    documents: HashMap<String, Frontmatter>,
}

impl InMemoryMetadataCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store frontmatter for a document.
    pub fn insert(&mut self, document_id: impl Into<String>, frontmatter: Frontmatter) {
        self.documents.insert(document_id.into(), frontmatter);
    }

    /// Parse a markdown document and cache its frontmatter.
    ///
    /// A document without a frontmatter block, or with one that fails to
    /// parse, is removed from the cache, so subsequent lookups miss.
    pub fn insert_markdown(&mut self, document_id: impl Into<String>, text: &str) -> Result<()> {
        let document_id = document_id.into();
        match parse_frontmatter(text) {
            Ok(Some(frontmatter)) => {
                debug!(document = %document_id, keys = frontmatter.len(), "Cached frontmatter");
                self.documents.insert(document_id, frontmatter);
                Ok(())
            }
            Ok(None) => {
                self.documents.remove(&document_id);
                Ok(())
            }
            Err(e) => {
                debug!(document = %document_id, error = %e, "Dropped unparsable frontmatter");
                self.documents.remove(&document_id);
                Err(e)
            }
        }
    }

    /// Forget a document.
    pub fn remove(&mut self, document_id: &str) -> Option<Frontmatter> {
        self.documents.remove(document_id)
    }
}

impl MetadataCache for InMemoryMetadataCache {
    fn frontmatter(&self, document_id: &str) -> Option<Frontmatter> {
        self.documents.get(document_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{DictionaryResolver, FrontmatterResolver};
    use serde_json::json;

    #[test]
    fn test_parse_frontmatter() {
        let fm = parse_frontmatter("---\nuse-var: true\nname: Alice\nage: 30\n---\nbody")
            .unwrap()
            .unwrap();

        assert_eq!(fm["use-var"], json!(true));
        assert_eq!(fm["name"], json!("Alice"));
        assert_eq!(fm["age"], json!(30));
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(parse_frontmatter("# Title\n---\n").unwrap().is_none());
        assert!(parse_frontmatter("").unwrap().is_none());
    }

    #[test]
    fn test_unclosed_frontmatter() {
        assert!(parse_frontmatter("---\nname: Alice\n").unwrap().is_none());
    }

    #[test]
    fn test_empty_frontmatter() {
        let fm = parse_frontmatter("---\n---\ntext").unwrap().unwrap();
        assert!(fm.is_empty());
    }

    #[test]
    fn test_crlf_and_dots_terminator() {
        let fm = parse_frontmatter("---\r\nname: Bob\r\n...\r\n").unwrap().unwrap();
        assert_eq!(fm["name"], json!("Bob"));
    }

    #[test]
    fn test_non_mapping_is_error() {
        let err = parse_frontmatter("---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, FrontvarsError::Frontmatter(_)));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let err = parse_frontmatter("---\nname: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, FrontvarsError::YamlError(_)));
    }

    #[test]
    fn test_cache_insert_markdown() {
        let mut cache = InMemoryMetadataCache::new();
        cache.insert_markdown("a.md", "---\nname: Alice\n---\n").unwrap();
        assert!(cache.frontmatter("a.md").is_some());

        cache.insert_markdown("a.md", "no frontmatter anymore").unwrap();
        assert!(cache.frontmatter("a.md").is_none());
    }

    #[test]
    fn test_cache_invalid_yaml_drops_stale_entry() {
        let mut cache = InMemoryMetadataCache::new();
        cache
            .insert_markdown("a.md", "---\nuse-var: true\nname: Alice\n---\n{name}")
            .unwrap();
        assert!(cache.frontmatter("a.md").is_some());

        let err = cache
            .insert_markdown("a.md", "---\nname: [Bob\n---\n{name}")
            .unwrap_err();
        assert!(matches!(err, FrontvarsError::YamlError(_)));
        assert!(cache.frontmatter("a.md").is_none());
        assert!(FrontmatterResolver::new(&cache).resolve("a.md").is_none());
    }
}
