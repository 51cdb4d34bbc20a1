//! Visual presentation of classified tokens.
//!
//! The same [`RenderSpec`] drives both the live decoration set and the
//! elements spliced into static output, so the two views look alike.

use crate::classify::RenderState;
use crate::dictionary::Dictionary;
use crate::dom::Element;
use crate::matcher::TokenMatch;
use crate::Settings;
use std::ops::Range;
use tracing::trace;

/// Class shared by every inserted replacement element.
pub const VAR_CLASS: &str = "frontvars-var";
/// Class of a resolved variable.
pub const RESOLVED_CLASS: &str = "frontvars-resolved";
/// Class of an undefined variable placeholder.
pub const MISSING_CLASS: &str = "frontvars-missing";
/// Class of a token under the cursor.
pub const EDITING_CLASS: &str = "frontvars-editing";
/// Attribute holding the hover text.
pub const TOOLTIP_ATTRIBUTE: &str = "title";

const EDITING_STYLE: &str = "text-decoration: underline; font-family: monospace";

/// What a decoration paints. Equality compares fields, not node identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderSpec {
    /// Token text replaced by the variable's value.
    Resolved { text: String, tooltip: Option<String> },

    /// Token text replaced by the placeholder.
    Missing { text: String, tooltip: Option<String> },

    /// Token text kept, marked as being edited.
    Editing { tooltip: Option<String> },
}

impl RenderSpec {
    /// Spec for a classified token, or `None` for states that leave the raw
    /// text visible (`Excluded`, `Suppressed`).
    pub fn for_state(
        state: &RenderState,
        token: &TokenMatch,
        dictionary: &Dictionary,
        settings: &Settings,
    ) -> Option<Self> {
        let tooltips = settings.tooltips_enabled;
        match state {
            RenderState::Excluded | RenderState::Suppressed => None,
            RenderState::Resolved { value } => Some(RenderSpec::Resolved {
                text: value.clone(),
                tooltip: tooltips.then(|| resolved_tooltip(&token.name, value)),
            }),
            RenderState::Missing { placeholder } => Some(RenderSpec::Missing {
                text: placeholder.clone(),
                tooltip: tooltips.then(|| missing_tooltip(&token.name)),
            }),
            RenderState::Editing => Some(RenderSpec::Editing {
                tooltip: tooltips.then(|| match dictionary.display_value(&token.name) {
                    Some(value) => resolved_tooltip(&token.name, &value),
                    None => missing_tooltip(&token.name),
                }),
            }),
        }
    }

    /// Hover text, if any.
    pub fn tooltip(&self) -> Option<&str> {
        match self {
            RenderSpec::Resolved { tooltip, .. }
            | RenderSpec::Missing { tooltip, .. }
            | RenderSpec::Editing { tooltip } => tooltip.as_deref(),
        }
    }

    /// Text shown in place of the token; `None` when the token stays visible.
    pub fn replacement_text(&self) -> Option<&str> {
        match self {
            RenderSpec::Resolved { text, .. } | RenderSpec::Missing { text, .. } => Some(text),
            RenderSpec::Editing { .. } => None,
        }
    }

    /// Render the concrete visual node. `token_text` is the raw token,
    /// shown only while editing.
    pub fn to_element(&self, token_text: &str) -> Element {
        match self {
            RenderSpec::Resolved { text, tooltip } => render_resolved(text, tooltip.as_deref()),
            RenderSpec::Missing { text, tooltip } => render_missing(text, tooltip.as_deref()),
            RenderSpec::Editing { tooltip } => render_editing(token_text, tooltip.as_deref()),
        }
    }
}

fn resolved_tooltip(name: &str, value: &str) -> String {
    format!("{} = {}", name, value)
}

fn missing_tooltip(name: &str) -> String {
    format!("Undefined variable: {}", name)
}

fn with_tooltip(el: Element, tooltip: Option<&str>) -> Element {
    match tooltip {
        Some(tip) => el.with_attribute(TOOLTIP_ATTRIBUTE, tip),
        None => el,
    }
}

fn render_resolved(text: &str, tooltip: Option<&str>) -> Element {
    let el = Element::new("span")
        .with_class(VAR_CLASS)
        .with_class(RESOLVED_CLASS)
        .with_text(text);
    with_tooltip(el, tooltip)
}

fn render_missing(text: &str, tooltip: Option<&str>) -> Element {
    let el = Element::new("span")
        .with_class(VAR_CLASS)
        .with_class(MISSING_CLASS)
        .with_text(text);
    with_tooltip(el, tooltip)
}

fn render_editing(token_text: &str, tooltip: Option<&str>) -> Element {
    let el = Element::new("span")
        .with_class(EDITING_CLASS)
        .with_attribute("style", EDITING_STYLE)
        .with_text(token_text);
    with_tooltip(el, tooltip)
}

/// A decoration over a document range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Start offset (inclusive).
    pub start: usize,

    /// End offset (exclusive).
    pub end: usize,

    /// What to paint.
    pub spec: RenderSpec,
}

impl Decoration {
    /// Document range covered.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Sorted, non-overlapping decorations.
///
/// Rebuilt wholesale on every qualifying change; the host diffs sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
    items: Vec<Decoration>,
}

impl DecorationSet {
    /// An empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a decoration. One that starts before the previous one ends is
    /// dropped and `false` is returned.
    pub fn push(&mut self, decoration: Decoration) -> bool {
        if let Some(last) = self.items.last() {
            if decoration.start < last.end {
                trace!(
                    start = decoration.start,
                    previous_end = last.end,
                    "Dropped overlapping decoration"
                );
                return false;
            }
        }
        self.items.push(decoration);
        true
    }

    /// Decorations in start order.
    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.items.iter()
    }

    /// Decorations as a slice.
    pub fn as_slice(&self) -> &[Decoration] {
        &self.items
    }

    /// Number of decorations.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is decorated.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::GATE_KEY;

    fn token(name: &str) -> TokenMatch {
        TokenMatch {
            name: name.to_string(),
            start: 0,
            end: name.len() + 2,
            full_text: format!("{{{}}}", name),
        }
    }

    fn deco(start: usize, end: usize) -> Decoration {
        Decoration {
            start,
            end,
            spec: RenderSpec::Editing { tooltip: None },
        }
    }

    #[test]
    fn test_spec_for_resolved() {
        let dict = Dictionary::new().with(GATE_KEY, true).with("name", "Alice");
        let state = RenderState::Resolved {
            value: "Alice".to_string(),
        };
        let spec =
            RenderSpec::for_state(&state, &token("name"), &dict, &Settings::default()).unwrap();

        assert_eq!(spec.replacement_text(), Some("Alice"));
        assert_eq!(spec.tooltip(), Some("name = Alice"));
    }

    #[test]
    fn test_spec_without_tooltips() {
        let settings = Settings::default().with_tooltips(false);
        let state = RenderState::Missing {
            placeholder: "[UNDEFINED]".to_string(),
        };
        let spec =
            RenderSpec::for_state(&state, &token("age"), &Dictionary::new(), &settings).unwrap();

        assert_eq!(spec.replacement_text(), Some("[UNDEFINED]"));
        assert_eq!(spec.tooltip(), None);
    }

    #[test]
    fn test_editing_tooltip_shows_value_or_missing() {
        let dict = Dictionary::new().with("name", "Alice");
        let settings = Settings::default();

        let known =
            RenderSpec::for_state(&RenderState::Editing, &token("name"), &dict, &settings).unwrap();
        assert_eq!(known.tooltip(), Some("name = Alice"));
        assert_eq!(known.replacement_text(), None);

        let unknown =
            RenderSpec::for_state(&RenderState::Editing, &token("age"), &dict, &settings).unwrap();
        assert_eq!(unknown.tooltip(), Some("Undefined variable: age"));
    }

    #[test]
    fn test_hidden_states_have_no_spec() {
        let dict = Dictionary::new();
        let settings = Settings::default();
        let spec_for = |state: &RenderState, name: &str| {
            RenderSpec::for_state(state, &token(name), &dict, &settings)
        };
        assert!(spec_for(&RenderState::Excluded, GATE_KEY).is_none());
        assert!(spec_for(&RenderState::Suppressed, "x").is_none());
    }

    #[test]
    fn test_to_element() {
        let resolved = RenderSpec::Resolved {
            text: "Alice".to_string(),
            tooltip: Some("name = Alice".to_string()),
        }
        .to_element("{name}");
        assert!(resolved.has_class(VAR_CLASS));
        assert!(resolved.has_class(RESOLVED_CLASS));
        assert_eq!(resolved.attribute(TOOLTIP_ATTRIBUTE), Some("name = Alice"));

        let editing = RenderSpec::Editing { tooltip: None }.to_element("{name}");
        assert!(editing.has_class(EDITING_CLASS));
        assert!(editing.attribute(TOOLTIP_ATTRIBUTE).is_none());
        assert_eq!(crate::dom::Node::from(editing).text_content(), "{name}");
    }

    #[test]
    fn test_set_drops_overlaps() {
        let mut set = DecorationSet::empty();
        assert!(set.push(deco(0, 5)));
        assert!(!set.push(deco(3, 8)));
        assert!(set.push(deco(5, 9)));
        assert_eq!(set.iter().map(Decoration::range).collect::<Vec<_>>(), [0..5, 5..9]);
    }
}
