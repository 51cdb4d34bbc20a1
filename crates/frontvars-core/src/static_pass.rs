//! Static rendering pass over finished, non-editable output.
//!
//! Text leaves are collected first and then spliced in reverse document
//! order, so replacing one leaf never shifts the position of a leaf that is
//! still waiting to be processed.

use crate::classify::classify;
use crate::decoration::{RenderSpec, VAR_CLASS};
use crate::dictionary::{Dictionary, DictionaryResolver};
use crate::dom::{Element, Node};
use crate::matcher::TokenPattern;
use crate::store::SettingsHandle;
use crate::Settings;
use std::ops::Range;
use tracing::{debug, trace};

/// Replaces tokens in rendered output with variable elements.
pub struct StaticRenderer<R> {
    settings: SettingsHandle,
    resolver: R,
}

impl<R: DictionaryResolver> StaticRenderer<R> {
    /// Create a renderer reading `settings` and looking up variables with `resolver`.
    pub fn new(settings: SettingsHandle, resolver: R) -> Self {
        Self { settings, resolver }
    }

    /// Rewrite the text leaves below `root` in place and return the number
    /// of tokens replaced.
    ///
    /// Text already inside an inserted variable element is left alone, so
    /// applying the pass twice changes nothing further. A text node used
    /// as `root` itself has no parent to splice into and is skipped.
    pub fn apply(&self, root: &mut Node, document_id: &str) -> usize {
        let settings = self.settings.load();
        if !settings.replacement_enabled {
            return 0;
        }

        let Some(dictionary) = self.resolver.resolve(document_id) else {
            trace!(document = %document_id, "No variables for document");
            return 0;
        };
        if dictionary.is_empty() || !dictionary.is_enabled() {
            trace!(document = %document_id, "Substitution not enabled for document");
            return 0;
        }

        let pattern = match TokenPattern::new(&settings.token_pattern) {
            Ok(pattern) => pattern,
            Err(e) => {
                debug!(document = %document_id, error = %e, "Skipping static pass");
                return 0;
            }
        };

        let mut leaves = Vec::new();
        collect_text_leaves(root, &mut Vec::new(), &mut leaves);

        let mut replaced = 0;
        for path in leaves.iter().rev() {
            replaced += splice_leaf(root, path, &pattern, &dictionary, &settings);
        }

        debug!(document = %document_id, leaves = leaves.len(), replaced, "Applied static pass");
        replaced
    }
}

/// Record the child-index path of every text leaf, in document order.
fn collect_text_leaves(node: &Node, path: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    match node {
        Node::Text(_) => out.push(path.clone()),
        Node::Element(el) if el.has_class(VAR_CLASS) => {}
        Node::Element(el) => {
            for (index, child) in el.children.iter().enumerate() {
                path.push(index);
                collect_text_leaves(child, path, out);
                path.pop();
            }
        }
    }
}

/// Replace the tokens of one leaf. Returns how many were replaced.
fn splice_leaf(
    root: &mut Node,
    path: &[usize],
    pattern: &TokenPattern,
    dictionary: &Dictionary,
    settings: &Settings,
) -> usize {
    let Some((&index, parent_path)) = path.split_last() else {
        return 0;
    };

    let replacements = match root.at_path(path) {
        Some(Node::Text(text)) => replacements_for(text, pattern, dictionary, settings),
        _ => {
            debug!(?path, "Text leaf detached before replacement");
            return 0;
        }
    };
    if replacements.is_empty() {
        return 0;
    }

    let Some(Node::Element(parent)) = root.at_path_mut(parent_path) else {
        debug!(?path, "Text leaf detached before replacement");
        return 0;
    };
    let Some(Node::Text(text)) = parent.children.get(index) else {
        return 0;
    };

    let count = replacements.len();
    let nodes = split_text(text, replacements);
    parent.children.splice(index..=index, nodes);
    count
}

/// Sorted, non-overlapping replacement elements for one text leaf.
fn replacements_for(
    text: &str,
    pattern: &TokenPattern,
    dictionary: &Dictionary,
    settings: &Settings,
) -> Vec<(Range<usize>, Element)> {
    let mut found: Vec<(Range<usize>, Element)> = pattern
        .matches_by_line(text)
        .filter_map(|token| {
            let state = classify(&token, dictionary, None, settings);
            let spec = RenderSpec::for_state(&state, &token, dictionary, settings)?;
            Some((token.range(), spec.to_element(&token.full_text)))
        })
        .collect();

    found.sort_by_key(|(range, _)| range.start);

    let mut last_end = 0;
    found.retain(|(range, _)| {
        let keep = range.start >= last_end;
        if keep {
            last_end = range.end;
        }
        keep
    });
    found
}

/// `[text][element]...[text]`, keeping every untouched byte.
fn split_text(text: &str, replacements: Vec<(Range<usize>, Element)>) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(replacements.len() * 2 + 1);
    let mut cursor = 0;

    for (range, element) in replacements {
        if range.start > cursor {
            nodes.push(Node::text(&text[cursor..range.start]));
        }
        nodes.push(Node::Element(element));
        cursor = range.end;
    }
    if cursor < text.len() {
        nodes.push(Node::text(&text[cursor..]));
    }
    nodes
}
