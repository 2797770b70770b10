//! Tests for error classification, the catalog and response formatting.

use pretty_assertions::assert_eq;
use serde_json::json;
use strum::IntoEnumIterator;
use taleweave::error::*;

#[test]
fn classification_follows_rule_order() {
    struct Case {
        message: &'static str,
        expected: ErrorKind,
    }

    let cases = vec![
        Case {
            message: "Error: Quota exceeded for this billing period",
            expected: ErrorKind::QuotaExhausted,
        },
        Case {
            message: "fetch failed: ECONNRESET",
            expected: ErrorKind::NetworkError,
        },
        Case {
            message: "Resource has been exhausted (e.g. check quota).",
            expected: ErrorKind::QuotaExhausted,
        },
        Case {
            message: "Request had too many tokens: token limit is 32768",
            expected: ErrorKind::TokenLimitExceeded,
        },
        Case {
            message: "401 Unauthorized",
            expected: ErrorKind::AuthenticationError,
        },
        Case {
            message: "Permission denied on resource project",
            expected: ErrorKind::AuthenticationError,
        },
        Case {
            message: "Rate limit exceeded for model",
            expected: ErrorKind::RateLimited,
        },
        Case {
            message: "Connection reset by peer",
            expected: ErrorKind::NetworkError,
        },
        Case {
            message: "Request timeout after 30s",
            expected: ErrorKind::NetworkError,
        },
        Case {
            message: "Malformed JSON payload",
            expected: ErrorKind::InvalidRequest,
        },
        Case {
            message: "400 Bad Request",
            expected: ErrorKind::InvalidRequest,
        },
        Case {
            message: "The model is overloaded",
            expected: ErrorKind::UnknownError,
        },
        Case {
            message: "",
            expected: ErrorKind::UnknownError,
        },
    ];

    for case in cases {
        assert_eq!(classify(case.message), case.expected, "message: {:?}", case.message);
    }
}

#[test]
fn first_matching_rule_wins() {
    // Matches both the quota and network rules.
    assert_eq!(
        classify("quota exhausted while the network was down"),
        ErrorKind::QuotaExhausted
    );
    // Matches both the auth and invalid-request rules.
    assert_eq!(classify("invalid api key"), ErrorKind::AuthenticationError);
    // "quota" alone is not enough.
    assert_eq!(classify("quota check"), ErrorKind::UnknownError);
}

#[test]
fn classification_ignores_case() {
    assert_eq!(classify("QUOTA EXCEEDED"), ErrorKind::QuotaExhausted);
    assert_eq!(classify("Network Unreachable"), ErrorKind::NetworkError);
}

#[test]
fn structured_failures_are_classified_by_message() {
    assert_eq!(
        classify_value(&json!({"error": {"message": "API key not valid"}})),
        ErrorKind::AuthenticationError
    );
    assert_eq!(
        classify_value(&json!({"message": "Rate limit reached"})),
        ErrorKind::RateLimited
    );
    assert_eq!(
        classify_value(&json!({"error": "fetch failed"})),
        ErrorKind::NetworkError
    );
    assert_eq!(classify_value(&json!(null)), ErrorKind::UnknownError);
}

#[test]
fn retryability_is_fixed_per_kind() {
    let retryable: Vec<ErrorKind> = ErrorKind::iter().filter(|k| k.is_retryable()).collect();
    assert_eq!(
        retryable,
        vec![
            ErrorKind::RateLimited,
            ErrorKind::NetworkError,
            ErrorKind::UnknownError
        ]
    );
}

#[test]
fn catalog_statuses_are_stable() {
    let statuses: Vec<(ErrorKind, u16)> = ErrorKind::iter().map(|k| (k, k.http_status())).collect();
    assert_eq!(
        statuses,
        vec![
            (ErrorKind::QuotaExhausted, 429),
            (ErrorKind::TokenLimitExceeded, 400),
            (ErrorKind::AuthenticationError, 401),
            (ErrorKind::RateLimited, 429),
            (ErrorKind::NetworkError, 503),
            (ErrorKind::InvalidRequest, 400),
            (ErrorKind::UnknownError, 500),
        ]
    );
}

#[test]
fn every_kind_has_copy_for_both_subsystems() {
    for kind in ErrorKind::iter() {
        let entry = kind.entry();
        assert_eq!(entry.kind, kind);
        assert!(!entry.user_message.is_empty());
        assert!(!entry.title.is_empty());
        for subsystem in [Subsystem::Narrative, Subsystem::Illustration] {
            assert!(!entry.description(subsystem).is_empty(), "{kind} {subsystem}");
            assert!(!entry.suggestions(subsystem).is_empty(), "{kind} {subsystem}");
        }
        assert_eq!(entry.non_retryable_note().is_some(), !entry.retryable);
    }
}

#[test]
fn formatted_response_uses_catalog_not_raw_text() {
    let raw = "Error: Quota exceeded for this billing period (project 1234567)";
    let record = ErrorRecord::classify(raw, Subsystem::Narrative);
    let formatted = format_error(&record);

    assert_eq!(formatted.status, 429);
    assert_eq!(formatted.body.code, ErrorKind::QuotaExhausted);
    assert!(!formatted.body.retryable);
    assert_eq!(formatted.body.error, ErrorKind::QuotaExhausted.user_message());

    let wire = serde_json::to_value(&formatted.body).unwrap();
    assert_eq!(
        wire,
        json!({
            "error": ErrorKind::QuotaExhausted.user_message(),
            "code": "QUOTA_EXHAUSTED",
            "retryable": false
        })
    );
    assert!(!wire.to_string().contains("1234567"));
}

#[test]
fn network_scenario_formats_as_503_retryable() {
    let record = ErrorRecord::classify("fetch failed: ECONNRESET", Subsystem::Illustration);
    let formatted = format_error(&record);

    assert_eq!(record.kind(), ErrorKind::NetworkError);
    assert_eq!(formatted.status, 503);
    assert!(formatted.body.retryable);
}

#[test]
fn story_error_kinds() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    assert_eq!(
        StoryError::Configuration("Missing API key: set GEMINI_API_KEY".into()).kind(),
        ErrorKind::AuthenticationError
    );
    assert_eq!(
        StoryError::InvalidArgument("story setting 'genre' must not be empty".into()).kind(),
        ErrorKind::InvalidRequest
    );
    assert_eq!(StoryError::Io(io_error).kind(), ErrorKind::UnknownError);
    assert_eq!(StoryError::Serialization(serde_error).kind(), ErrorKind::UnknownError);
}

#[test]
fn error_codes_round_trip_through_strings() {
    for kind in ErrorKind::iter() {
        assert_eq!(ErrorKind::from_code(kind.code()), kind);
        let json = serde_json::to_value(kind).unwrap();
        assert_eq!(json, json!(kind.code()));
    }
    assert_eq!(ErrorKind::from_code("NOT_A_CODE"), ErrorKind::UnknownError);
}

#[test]
fn subsystem_wording_differs() {
    let entry = ErrorKind::NetworkError.entry();
    assert_ne!(
        entry.description(Subsystem::Narrative),
        entry.description(Subsystem::Illustration)
    );
    assert_eq!(Subsystem::Narrative.label(), "story generation");
    assert_eq!(Subsystem::Illustration.label(), "image generation");
}
