//! # Frontvars Core
//!
//! Frontmatter variable substitution for document editors.
//!
//! Documents opt in with `use-var: true` in their frontmatter. Every
//! `{name}` token is then shown as the value of `name`, as a placeholder
//! when `name` is undefined, or as raw text while the cursor is on it.
//!
//! ## Features
//!
//! - Lazy, line-at-a-time token matching with a user-editable pattern
//! - Per-document dictionaries read fresh from the host metadata cache
//! - A live decoration engine for editable views
//! - A static pass that rewrites finished, non-editable output in place
//! - A persisted settings record shared by both engines
//!
//! ## Example
//!
//! ```rust
//! use frontvars_core::prelude::*;
//! use frontvars_core::frontmatter::InMemoryMetadataCache;
//!
//! let mut cache = InMemoryMetadataCache::new();
//! cache.insert_markdown("note.md", "---\nuse-var: true\nname: Alice\n---\n").unwrap();
//!
//! let resolver = FrontmatterResolver::new(&cache);
//! let engine = LiveDecorationEngine::new(SettingsHandle::default(), resolver);
//! let view = TextSnapshot::new("Hi {name}").with_document("note.md");
//! let decorations = engine.build(&view);
//!
//! assert_eq!(decorations.as_slice()[0].spec.replacement_text(), Some("Alice"));
//! ```

pub mod error;
pub mod config;
pub mod store;
pub mod matcher;
pub mod dictionary;
pub mod frontmatter;
pub mod classify;
pub mod decoration;
pub mod dom;
pub mod live;
pub mod static_pass;

pub use error::{FrontvarsError, Result};
pub use config::Settings;
pub use store::{SettingChange, SettingsHandle, SettingsStore, SettingsStorage};
pub use matcher::{TokenMatch, TokenPattern};
pub use dictionary::{Dictionary, DictionaryResolver, FrontmatterResolver, MetadataCache};
pub use classify::{classify, RenderState};
pub use decoration::{Decoration, DecorationSet, RenderSpec};
pub use live::{LiveDecorationEngine, TextSnapshot, ViewChange};
pub use static_pass::StaticRenderer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        classify, Decoration, DecorationSet, Dictionary, DictionaryResolver, FrontmatterResolver,
        FrontvarsError, LiveDecorationEngine, MetadataCache, RenderSpec, RenderState, Result,
        SettingChange, Settings, SettingsHandle, SettingsStorage, SettingsStore, StaticRenderer,
        TextSnapshot, TokenMatch, TokenPattern, ViewChange,
    };
    pub use crate::live::{DocumentView, OpenView, ViewHost};
    pub use crate::dom::{Element, Node};
}
