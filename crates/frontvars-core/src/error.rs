//! Error types for Frontvars Core.

use thiserror::Error;

/// Result type alias for Frontvars operations.
pub type Result<T> = std::result::Result<T, FrontvarsError>;

/// Main error type for the substitution engine.
///
/// None of these are fatal to the host: the engines catch them at the point
/// of use and fall back to leaving the original text untouched.
#[derive(Debug, Error)]
pub enum FrontvarsError {
    /// The configured token pattern could not be compiled or has no capture group.
    #[error("Token pattern error: {0}")]
    PatternMalformed(String),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Frontmatter block could not be interpreted as a key/value mapping.
    #[error("Frontmatter error: {0}")]
    Frontmatter(String),

    /// IO operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML deserialization failed.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),
}
