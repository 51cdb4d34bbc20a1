//! # Frontvars Configuration
//!
//! The flat settings record shared by the live and static engines.
//! Supports loading from a persisted (possibly partial) record, environment
//! variables, and programmatic defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Default token pattern: `{name}`.
pub const DEFAULT_TOKEN_PATTERN: &str = "{([^}]+)}";

/// Default text shown in place of an undefined variable.
pub const DEFAULT_MISSING_PLACEHOLDER: &str = "[UNDEFINED]";

/// Process-wide configuration for variable substitution.
///
/// Keys are persisted in camelCase. Every field falls back to its default
/// when absent from a stored record.
///
/// # Example
/// ```rust
/// use frontvars_core::Settings;
///
/// let settings = Settings::default()
///     .with_missing_placeholder_text("??")
///     .with_tooltips(false);
/// assert!(settings.replacement_enabled);
/// assert_eq!(settings.missing_placeholder_text, "??");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Master switch for substitution in every view.
    /// Default: true, Env: FRONTVARS_ENABLED=false
    pub replacement_enabled: bool,

    /// Single-capture-group pattern; group 1 is the variable name.
    /// Not validated on save; a malformed pattern yields no matches.
    /// Default: `{([^}]+)}`, Env: FRONTVARS_PATTERN
    pub token_pattern: String,

    /// Show a placeholder for variables absent from the dictionary.
    /// Default: true, Env: FRONTVARS_SHOW_MISSING=false
    pub show_missing_placeholder: bool,

    /// Placeholder text for undefined variables.
    /// Default: `[UNDEFINED]`, Env: FRONTVARS_MISSING_TEXT
    pub missing_placeholder_text: String,

    /// Attach hover tooltips to rendered variables.
    /// Default: true, Env: FRONTVARS_TOOLTIPS=false
    pub tooltips_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            replacement_enabled: true,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            show_missing_placeholder: true,
            missing_placeholder_text: DEFAULT_MISSING_PLACEHOLDER.to_string(),
            tooltips_enabled: true,
        }
    }
}

impl Settings {
    /// Create settings from environment variables.
    /// Falls back to defaults for missing variables.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(v) = env::var("FRONTVARS_ENABLED") {
            settings.replacement_enabled = parse_flag(&v);
        }
        if let Ok(v) = env::var("FRONTVARS_PATTERN") {
            settings.token_pattern = v;
        }
        if let Ok(v) = env::var("FRONTVARS_SHOW_MISSING") {
            settings.show_missing_placeholder = parse_flag(&v);
        }
        if let Ok(v) = env::var("FRONTVARS_MISSING_TEXT") {
            settings.missing_placeholder_text = v;
        }
        if let Ok(v) = env::var("FRONTVARS_TOOLTIPS") {
            settings.tooltips_enabled = parse_flag(&v);
        }

        settings
    }

    /// Build settings from a stored record, filling absent keys with defaults.
    pub fn from_stored(value: serde_json::Value) -> crate::Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| {
            crate::FrontvarsError::ConfigError(format!("invalid stored settings: {}", e))
        })
    }

    /// Builder: Enable or disable substitution.
    pub fn with_replacement(mut self, enabled: bool) -> Self {
        self.replacement_enabled = enabled;
        self
    }

    /// Builder: Set the token pattern.
    pub fn with_token_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.token_pattern = pattern.into();
        self
    }

    /// Builder: Show or hide the missing-variable placeholder.
    pub fn with_missing_placeholder(mut self, show: bool) -> Self {
        self.show_missing_placeholder = show;
        self
    }

    /// Builder: Set the missing-variable placeholder text.
    pub fn with_missing_placeholder_text(mut self, text: impl Into<String>) -> Self {
        self.missing_placeholder_text = text.into();
        self
    }

    /// Builder: Enable or disable tooltips.
    pub fn with_tooltips(mut self, enabled: bool) -> Self {
        self.tooltips_enabled = enabled;
        self
    }
}

fn parse_flag(v: &str) -> bool {
    v.eq_ignore_ascii_case("true") || v == "1"
}
