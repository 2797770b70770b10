//! Map raw upstream failures to an [`ErrorKind`].
//!
//! Classification is substring based and case-insensitive. Categories overlap
//! lexically ("token limit" vs "rate limit"), so rules are evaluated in a
//! fixed priority order and the first match wins.

use serde_json::Value;

use super::kind::ErrorKind;

type Predicate = fn(&str) -> bool;

/// Ordered classification rules. Order is significant.
const RULES: [(Predicate, ErrorKind); 6] = [
    (is_quota, ErrorKind::QuotaExhausted),
    (is_token_limit, ErrorKind::TokenLimitExceeded),
    (is_authentication, ErrorKind::AuthenticationError),
    (is_rate_limit, ErrorKind::RateLimited),
    (is_network, ErrorKind::NetworkError),
    (is_invalid_request, ErrorKind::InvalidRequest),
];

fn contains_any(message: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| message.contains(needle))
}

fn is_quota(message: &str) -> bool {
    message.contains("quota") && contains_any(message, &["exhausted", "exceeded"])
}

fn is_token_limit(message: &str) -> bool {
    message.contains("token") && contains_any(message, &["limit", "too long", "exceed"])
}

fn is_authentication(message: &str) -> bool {
    contains_any(message, &["auth", "unauthorized", "api key", "permission"])
}

fn is_rate_limit(message: &str) -> bool {
    message.contains("rate") && message.contains("limit")
}

fn is_network(message: &str) -> bool {
    contains_any(message, &["network", "connection", "timeout", "fetch"])
}

fn is_invalid_request(message: &str) -> bool {
    contains_any(message, &["invalid", "bad request", "malformed"])
}

/// Classify a raw failure message. Never fails; unmatched input is `UnknownError`.
pub fn classify(message: &str) -> ErrorKind {
    // ASCII lowering keeps the result independent of locale rules.
    let message = message.to_ascii_lowercase();
    RULES
        .iter()
        .find(|(matches, _)| matches(&message))
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::UnknownError)
}

/// Extract the message of a structured failure.
///
/// Prefers an explicit `message` field, then `error` (followed into nested
/// envelopes such as `{"error": {"message": ...}}`), then the value's
/// string form.
pub fn failure_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(Value::String(message)) = map.get("message") {
                return message.clone();
            }
            match map.get("error") {
                Some(Value::String(error)) => error.clone(),
                Some(nested @ Value::Object(_)) => failure_message(nested),
                _ => value.to_string(),
            }
        }
        other => other.to_string(),
    }
}

/// Classify a structured failure value.
pub fn classify_value(value: &Value) -> ErrorKind {
    classify(&failure_message(value))
}
