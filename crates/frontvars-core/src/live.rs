//! Live decoration engine for editable views.
//!
//! On every document, viewport or selection change the engine rescans the
//! lines around the viewport, classifies each token against the cursor and
//! the document's dictionary, and rebuilds the decoration set from scratch.
//! It never touches document text.

use crate::classify::classify;
use crate::decoration::{Decoration, DecorationSet, RenderSpec};
use crate::dictionary::DictionaryResolver;
use crate::matcher::TokenPattern;
use crate::store::SettingsHandle;
use bitflags::bitflags;
use std::ops::Range;
use tracing::{debug, trace};

/// Offsets scanned beyond each side of the viewport, so tokens do not pop
/// in while scrolling.
pub const VIEWPORT_MARGIN: usize = 1000;

bitflags! {
    /// What changed in a view since the last update.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ViewChange: u8 {
        /// Document text was edited.
        const DOC = 1 << 0;
        /// The visible range moved.
        const VIEWPORT = 1 << 1;
        /// The selection or cursor moved.
        const SELECTION = 1 << 2;
    }
}

/// One line of document text, without its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Zero-based line number.
    pub number: usize,

    /// Document offset of the first byte of the line.
    pub from: usize,

    /// Line content.
    pub text: &'a str,
}

impl Line<'_> {
    /// Document offset just past the line content.
    pub fn to(&self) -> usize {
        self.from + self.text.len()
    }
}

/// An open, editable document view as seen by the engine.
///
/// Offsets are byte offsets into the document text.
pub trait DocumentView {
    /// Identifier of the document shown, if any.
    fn document_id(&self) -> Option<&str>;

    /// Document length.
    fn len(&self) -> usize;

    /// True for an empty document.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of lines (at least one).
    fn line_count(&self) -> usize;

    /// Line by number.
    fn line(&self, number: usize) -> Option<Line<'_>>;

    /// Line containing `offset`, clamped to the document.
    fn line_at(&self, offset: usize) -> Line<'_>;

    /// Visible range.
    fn viewport(&self) -> Range<usize>;

    /// Cursor (main selection head), if the view has focus.
    fn cursor(&self) -> Option<usize>;
}

/// A document view over owned text.
#[derive(Debug, Clone)]
pub struct TextSnapshot {
    document_id: Option<String>,
    text: String,
    line_starts: Vec<usize>,
    viewport: Range<usize>,
    cursor: Option<usize>,
}

impl TextSnapshot {
    /// Snapshot of `text` with the whole document visible and no cursor.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        let viewport = 0..text.len();

        Self {
            document_id: None,
            text,
            line_starts,
            viewport,
            cursor: None,
        }
    }

    /// Builder: set the document identifier.
    pub fn with_document(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    /// Builder: set the visible range.
    pub fn with_viewport(mut self, viewport: Range<usize>) -> Self {
        self.viewport = viewport;
        self
    }

    /// Builder: set the cursor.
    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Move the cursor.
    pub fn set_cursor(&mut self, cursor: Option<usize>) {
        self.cursor = cursor;
    }

    /// Document text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl DocumentView for TextSnapshot {
    fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    fn len(&self) -> usize {
        self.text.len()
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line(&self, number: usize) -> Option<Line<'_>> {
        let from = *self.line_starts.get(number)?;
        let end = self
            .line_starts
            .get(number + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let raw = &self.text[from..end];

        Some(Line {
            number,
            from,
            text: raw.strip_suffix('\r').unwrap_or(raw),
        })
    }

    fn line_at(&self, offset: usize) -> Line<'_> {
        let offset = offset.min(self.text.len());
        let number = match self.line_starts.binary_search(&offset) {
            Ok(n) => n,
            Err(n) => n.saturating_sub(1),
        };
        self.line(number).unwrap_or(Line {
            number: 0,
            from: 0,
            text: "",
        })
    }

    fn viewport(&self) -> Range<usize> {
        self.viewport.clone()
    }

    fn cursor(&self) -> Option<usize> {
        self.cursor
    }
}

/// Decoration provider for one editable view.
///
/// Holds only the settings handle, the resolver capability and the last
/// computed decoration set.
pub struct LiveDecorationEngine<R> {
    settings: SettingsHandle,
    resolver: R,
    decorations: DecorationSet,
}

impl<R: DictionaryResolver> LiveDecorationEngine<R> {
    /// Create an engine with an empty decoration set.
    pub fn new(settings: SettingsHandle, resolver: R) -> Self {
        Self {
            settings,
            resolver,
            decorations: DecorationSet::empty(),
        }
    }

    /// Create an engine and build its initial decorations for `view`.
    pub fn for_view(settings: SettingsHandle, resolver: R, view: &dyn DocumentView) -> Self {
        let mut engine = Self::new(settings, resolver);
        engine.decorations = engine.build(view);
        engine
    }

    /// Decorations to paint; the host calls this on each repaint.
    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    /// Handle a change event. Any document, viewport or selection change
    /// triggers a full rebuild. Returns whether the decorations changed.
    pub fn update(&mut self, view: &dyn DocumentView, change: ViewChange) -> bool {
        if change.is_empty() {
            return false;
        }
        let next = self.build(view);
        if next == self.decorations {
            return false;
        }
        self.decorations = next;
        true
    }

    /// Compute the decoration set for the current state of `view`.
    pub fn build(&self, view: &dyn DocumentView) -> DecorationSet {
        let settings = self.settings.load();
        if !settings.replacement_enabled {
            return DecorationSet::empty();
        }

        let Some(document_id) = view.document_id() else {
            return DecorationSet::empty();
        };
        let Some(dictionary) = self.resolver.resolve(document_id) else {
            trace!(document = %document_id, "No variables for document");
            return DecorationSet::empty();
        };
        if !dictionary.is_enabled() {
            trace!(document = %document_id, "Substitution not enabled for document");
            return DecorationSet::empty();
        }

        let pattern = match TokenPattern::new(&settings.token_pattern) {
            Ok(pattern) => pattern,
            Err(e) => {
                debug!(document = %document_id, error = %e, "Skipping decoration pass");
                return DecorationSet::empty();
            }
        };

        let viewport = view.viewport();
        let window_start = viewport.start.saturating_sub(VIEWPORT_MARGIN);
        let window_end = viewport.end.saturating_add(VIEWPORT_MARGIN).min(view.len());
        let cursor = view.cursor();

        let mut set = DecorationSet::empty();
        let first = view.line_at(window_start).number;

        for number in first..view.line_count() {
            let Some(line) = view.line(number) else {
                break;
            };
            if line.from > window_end {
                break;
            }

            for token in pattern.matches(line.text) {
                let token = token.shifted(line.from);
                if token.start > window_end || token.end < window_start {
                    continue;
                }

                let state = classify(&token, &dictionary, cursor, &settings);
                if let Some(spec) = RenderSpec::for_state(&state, &token, &dictionary, &settings) {
                    set.push(Decoration {
                        start: token.start,
                        end: token.end,
                        spec,
                    });
                }
            }
        }

        trace!(document = %document_id, decorations = set.len(), "Built decorations");
        set
    }
}

/// An open view known to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenView {
    /// Editable view showing a document.
    Editable(String),

    /// Non-editable (reading) view showing a document.
    Reading(String),
}

/// Host capability used to redraw open views after a settings change.
pub trait ViewHost {
    /// All open views.
    fn open_views(&self) -> Vec<OpenView>;

    /// Dispatch the current selection unchanged, so the editable view
    /// recomputes its decorations.
    fn redispatch_selection(&mut self, document_id: &str);

    /// Re-render a reading view, which reruns the static pass.
    fn rerender(&mut self, document_id: &str);
}

/// Force every open view to recompute after a configuration change.
pub fn refresh_views(host: &mut dyn ViewHost) {
    let views = host.open_views();
    debug!(views = views.len(), "Refreshing open views");

    for view in views {
        match view {
            OpenView::Editable(id) => host.redispatch_selection(&id),
            OpenView::Reading(id) => host.rerender(&id),
        }
    }
}
