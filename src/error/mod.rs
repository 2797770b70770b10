//! Error types for Taleweave.
//!
//! Two layers live here. [`StoryError`] is the internal error returned by
//! library operations. The classification layer (`kind`, `classify`,
//! `catalog`, `record`, `response`) turns any failure into one of a closed
//! set of [`ErrorKind`]s with controlled, user-facing copy.

pub mod catalog;
pub mod classify;
pub mod kind;
pub mod record;
pub mod response;

pub use catalog::{CatalogEntry, ErrorIcon};
pub use classify::{classify, classify_value, failure_message};
pub use kind::{ErrorKind, Subsystem};
pub use record::ErrorRecord;
pub use response::{format_error, ErrorResponse, FormattedError};

use thiserror::Error;

/// Primary error type for all Taleweave operations.
#[derive(Error, Debug)]
pub enum StoryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid story file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl StoryError {
    /// Create an API error from an upstream status and body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// The text the classifier should look at.
    ///
    /// Upstream API bodies are JSON envelopes; their `message`/`error` field
    /// is preferred over the raw body. Every other variant uses its display
    /// form, whose prefix ("Network error", ...) carries the category.
    pub fn failure_message(&self) -> String {
        match self {
            Self::Api { message, .. } => match serde_json::from_str::<serde_json::Value>(message) {
                Ok(value) => failure_message(&value),
                Err(_) => message.clone(),
            },
            other => other.to_string(),
        }
    }

    /// Classify this error into an [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        classify(&self.failure_message())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, StoryError>;
