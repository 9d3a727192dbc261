// Licensed under the Apache-2.0 license

//! Error type shared by every stage of the export.

use thiserror::Error;

/// Errors that terminate an export.
///
/// None of these are retried: an export either runs to completion or stops
/// at the first error, leaving no document behind.
#[derive(Error, Debug)]
pub enum ExportError {
    /// An option key or value that the exporter does not understand.
    #[error("invalid export option: {0}")]
    Config(String),

    /// The model did not define a property the exporter cannot default.
    #[error("{path}: required property '{property}' is not defined")]
    MissingProperty { path: String, property: String },

    /// A property exists but holds a value of the wrong kind or range.
    #[error("{path}: property '{property}' has unsupported value {value}")]
    InvalidProperty {
        path: String,
        property: String,
        value: String,
    },

    /// The rendering backend was driven out of order.
    #[error("document backend: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    pub(crate) fn missing(path: &str, property: &str) -> Self {
        ExportError::MissingProperty {
            path: path.to_string(),
            property: property.to_string(),
        }
    }

    pub(crate) fn invalid(path: &str, property: &str, value: impl std::fmt::Display) -> Self {
        ExportError::InvalidProperty {
            path: path.to_string(),
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
