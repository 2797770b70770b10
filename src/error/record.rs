//! Classified, immutable error records.

use serde::Serialize;

use super::kind::{ErrorKind, Subsystem};
use super::response::ErrorResponse;
use super::StoryError;

/// A classified failure attached to UI/session state.
///
/// Records are never mutated; a new failure replaces the old record wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    kind: ErrorKind,
    raw_message: String,
    user_message: String,
    http_status: u16,
    retryable: bool,
    subsystem: Subsystem,
}

impl ErrorRecord {
    /// Build a record for a known kind, taking copy and flags from the catalog.
    pub fn new(kind: ErrorKind, raw_message: impl Into<String>, subsystem: Subsystem) -> Self {
        let entry = kind.entry();
        Self {
            kind,
            raw_message: raw_message.into(),
            user_message: entry.user_message.to_string(),
            http_status: entry.http_status,
            retryable: entry.retryable,
            subsystem,
        }
    }

    /// Classify a raw failure message.
    pub fn classify(raw_message: impl Into<String>, subsystem: Subsystem) -> Self {
        let raw_message = raw_message.into();
        let kind = super::classify(&raw_message);
        Self::new(kind, raw_message, subsystem)
    }

    /// Classify an internal error. The raw message keeps the full display form.
    pub fn from_error(error: &StoryError, subsystem: Subsystem) -> Self {
        Self::new(error.kind(), error.to_string(), subsystem)
    }

    /// The client's own backend could not be reached; there is no body to classify.
    pub fn transport_failure(raw_message: impl Into<String>, subsystem: Subsystem) -> Self {
        Self::new(ErrorKind::NetworkError, raw_message, subsystem)
    }

    /// Rebuild a record from a failure response received over the wire.
    ///
    /// The server already redacted the message, so it doubles as the raw text.
    pub fn from_response(response: ErrorResponse, http_status: u16, subsystem: Subsystem) -> Self {
        Self {
            kind: response.code,
            raw_message: response.error.clone(),
            user_message: response.error,
            http_status,
            retryable: response.retryable,
            subsystem,
        }
    }

    /// A failure response arrived but its body could not be parsed.
    pub fn unreadable_response(http_status: u16, subsystem: Subsystem) -> Self {
        let user_message = match subsystem {
            Subsystem::Narrative => "Error generating story",
            Subsystem::Illustration => "Error generating image",
        };
        Self {
            kind: ErrorKind::UnknownError,
            raw_message: format!("unreadable error response (status {http_status})"),
            user_message: user_message.to_string(),
            http_status,
            retryable: true,
            subsystem,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn raw_message(&self) -> &str {
        &self.raw_message
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn subsystem(&self) -> Subsystem {
        self.subsystem
    }

    /// Title for display, from the catalog.
    pub fn title(&self) -> &'static str {
        self.kind.entry().title
    }

    pub fn description(&self) -> String {
        self.kind.entry().description(self.subsystem)
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.kind.entry().suggestions(self.subsystem)
    }
}
