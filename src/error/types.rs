//! Error type definitions
//!
//! Defines the error types produced while resolving xlwings Server settings.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for settings resolution
#[derive(Error, Debug)]
pub enum Error {
    /// A raw value could not be coerced to its declared type or broke a constraint
    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigurationValue {
        field: String,
        value: String,
        reason: String,
    },

    /// The override file exists but could not be read or parsed
    #[error("Failed to load override file {}: {source}", path.display())]
    OverrideFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// Configuration errors not tied to a single field
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization errors
    #[error("TOML error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid value error for a field
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfigurationValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an override file error
    pub fn override_file(path: impl Into<PathBuf>, source: dotenvy::Error) -> Self {
        Self::OverrideFile {
            path: path.into(),
            source,
        }
    }

    /// Name of the offending field, if this error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidConfigurationValue { field, .. } => Some(field),
            _ => None,
        }
    }
}
