//! Wire-level failure responses.

use serde::{Deserialize, Serialize};

use super::kind::ErrorKind;
use super::record::ErrorRecord;

/// Failure body sent to clients: redacted message, code and retry flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: ErrorKind,
    pub retryable: bool,
}

/// A failure body paired with its transport status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedError {
    pub status: u16,
    pub body: ErrorResponse,
}

/// Format a record for the wire and log the raw failure.
///
/// Status, retry flag and message always come from the catalog entry for
/// the record's kind. This is the only place raw upstream text is recorded.
pub fn format_error(record: &ErrorRecord) -> FormattedError {
    let entry = record.kind().entry();

    tracing::error!(
        subsystem = %record.subsystem(),
        code = %record.kind(),
        status = entry.http_status,
        raw = record.raw_message(),
        user_message = entry.user_message,
        "API error in {}",
        record.subsystem().label()
    );

    FormattedError {
        status: entry.http_status,
        body: ErrorResponse {
            error: entry.user_message.to_string(),
            code: record.kind(),
            retryable: entry.retryable,
        },
    }
}
