//! Error types for document and configuration I/O.
//!
//! Covers file access, JSON/YAML (de)serialization and unrecognized file
//! formats. Validation findings are not errors here; they are returned as
//! [`ValidationErrors`](field_schema_core::ValidationErrors) data.

use thiserror::Error;

/// Errors that can occur while reading or writing documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension maps to no supported format.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Configuration content is structurally valid but unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results with [`DocumentError`].
pub type Result<T> = std::result::Result<T, DocumentError>;
