//! Minimal output tree for static rendering.
//!
//! Elements carry a tag, classes, attributes and children; text lives only
//! in [`Node::Text`] leaves.

use std::collections::BTreeMap;

/// A node of a rendered output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with children.
    Element(Element),

    /// Text-bearing leaf.
    Text(String),
}

impl Node {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Element view of this node.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Node at a child-index path below this node.
    pub fn at_path(&self, path: &[usize]) -> Option<&Node> {
        path.iter().try_fold(self, |node, &index| match node {
            Node::Element(el) => el.children.get(index),
            Node::Text(_) => None,
        })
    }

    /// Mutable node at a child-index path below this node.
    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        path.iter().try_fold(self, |node, &index| match node {
            Node::Element(el) => el.children.get_mut(index),
            Node::Text(_) => None,
        })
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An element node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name, e.g. `span`.
    pub tag: String,

    /// CSS classes in insertion order.
    pub classes: Vec<String>,

    /// Attributes such as `title`.
    pub attributes: BTreeMap<String, String>,

    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no classes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder: add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder: set an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder: append a text child.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::text(text))
    }

    /// Whether the element carries a class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
