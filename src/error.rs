//! Error types for the conversion graph

use std::fmt;

use thiserror::Error;

use crate::tree::FieldPath;

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error raised by a link's transform function
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which registry a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Type,
    Link,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Type => write!(f, "type"),
            EntryKind::Link => write!(f, "link"),
        }
    }
}

/// Conversion graph errors
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Unknown type: {name}")]
    UnknownType { name: String },

    #[error("Unknown link: {name}")]
    UnknownLink { name: String },

    #[error("Type mismatch: link {link} expects a value of type {expected}")]
    TypeMismatch { link: String, expected: String },

    #[error("Link {link} failed: {source}")]
    TransformFailed {
        link: String,
        #[source]
        source: BoxError,
    },

    #[error("Chain must contain at least one link")]
    EmptyChain,

    #[error("Missing field: {path}")]
    MissingField { path: FieldPath },

    #[error("Shape mismatch at {path}: schema expects {expected}")]
    ShapeMismatch { path: FieldPath, expected: &'static str },

    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: EntryKind, name: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid schema at {path}: {reason}")]
    InvalidSchema { path: FieldPath, reason: String },

    #[error("Unknown extension: {0}")]
    UnknownExtension(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl GraphError {
    pub(crate) fn transform_failed(link: &str, source: impl Into<BoxError>) -> Self {
        GraphError::TransformFailed {
            link: link.to_string(),
            source: source.into(),
        }
    }
}
