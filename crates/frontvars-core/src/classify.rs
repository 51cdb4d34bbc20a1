//! Classification of a token into its render state.

use crate::dictionary::{Dictionary, GATE_KEY};
use crate::matcher::TokenMatch;
use crate::Settings;

/// How a token is presented. Recomputed on every pass, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    /// The gate key itself; text passes through unchanged.
    Excluded,

    /// The cursor is inside or touching the token; raw text stays visible.
    Editing,

    /// The variable is defined.
    Resolved { value: String },

    /// The variable is undefined and a placeholder is shown.
    Missing { placeholder: String },

    /// The variable is undefined and placeholders are disabled.
    Suppressed,
}

impl RenderState {
    /// Whether this state produces a visual replacement or mark.
    pub fn is_visible(&self) -> bool {
        matches!(
            self,
            RenderState::Editing | RenderState::Resolved { .. } | RenderState::Missing { .. }
        )
    }
}

/// Decide the render state of a token. First matching rule wins:
///
/// 1. the gate key is [`RenderState::Excluded`];
/// 2. a cursor within `start..=end` is [`RenderState::Editing`];
/// 3. a defined variable is [`RenderState::Resolved`];
/// 4. with placeholders enabled, [`RenderState::Missing`];
/// 5. otherwise [`RenderState::Suppressed`].
///
/// The static pass always passes `cursor = None`.
pub fn classify(
    token: &TokenMatch,
    dictionary: &Dictionary,
    cursor: Option<usize>,
    settings: &Settings,
) -> RenderState {
    if token.name == GATE_KEY {
        return RenderState::Excluded;
    }

    if let Some(cursor) = cursor {
        if cursor >= token.start && cursor <= token.end {
            return RenderState::Editing;
        }
    }

    if let Some(value) = dictionary.display_value(&token.name) {
        return RenderState::Resolved { value };
    }

    if settings.show_missing_placeholder {
        RenderState::Missing {
            placeholder: settings.missing_placeholder_text.clone(),
        }
    } else {
        RenderState::Suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(name: &str, start: usize, end: usize) -> TokenMatch {
        TokenMatch {
            name: name.to_string(),
            start,
            end,
            full_text: format!("{{{}}}", name),
        }
    }

    fn dict() -> Dictionary {
        Dictionary::new().with(GATE_KEY, true).with("name", "Alice")
    }

    #[test]
    fn test_gate_key_is_excluded() {
        let settings = Settings::default();
        let t = token(GATE_KEY, 0, 9);
        assert_eq!(classify(&t, &dict(), None, &settings), RenderState::Excluded);
        // Even with the cursor on it.
        assert_eq!(classify(&t, &dict(), Some(3), &settings), RenderState::Excluded);
    }

    #[test]
    fn test_cursor_boundaries_are_inclusive() {
        let settings = Settings::default();
        let t = token("name", 10, 16);

        assert_eq!(classify(&t, &dict(), Some(10), &settings), RenderState::Editing);
        assert_eq!(classify(&t, &dict(), Some(13), &settings), RenderState::Editing);
        assert_eq!(classify(&t, &dict(), Some(16), &settings), RenderState::Editing);
        assert_ne!(classify(&t, &dict(), Some(9), &settings), RenderState::Editing);
        assert_ne!(classify(&t, &dict(), Some(17), &settings), RenderState::Editing);
    }

    #[test]
    fn test_resolved() {
        let state = classify(&token("name", 0, 6), &dict(), None, &Settings::default());
        assert_eq!(
            state,
            RenderState::Resolved {
                value: "Alice".to_string()
            }
        );
    }

    #[test]
    fn test_missing_uses_placeholder_text() {
        let settings = Settings::default().with_missing_placeholder_text("??");
        let state = classify(&token("age", 0, 5), &dict(), None, &settings);
        assert_eq!(
            state,
            RenderState::Missing {
                placeholder: "??".to_string()
            }
        );
    }

    #[test]
    fn test_suppressed_when_placeholder_disabled() {
        let settings = Settings::default().with_missing_placeholder(false);
        let state = classify(&token("age", 0, 5), &dict(), None, &settings);
        assert_eq!(state, RenderState::Suppressed);
        assert!(!state.is_visible());
    }
}
