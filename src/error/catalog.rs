//! Static catalog of user-facing copy and transport metadata per error kind.
//!
//! Copy is parameterised only by [`Subsystem`], never by the raw failure
//! text, so upstream internals cannot leak into what users see.

use serde::Serialize;

use super::kind::{ErrorKind, Subsystem};

/// Icon category shown next to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorIcon {
    Quota,
    Network,
    Auth,
    Warning,
}

/// Everything the presentation layer needs to know about one error kind.
#[derive(Debug)]
pub struct CatalogEntry {
    pub kind: ErrorKind,
    pub user_message: &'static str,
    pub http_status: u16,
    pub retryable: bool,
    pub title: &'static str,
    pub icon: ErrorIcon,
    description: fn(Subsystem) -> String,
    suggestions: fn(Subsystem) -> Vec<String>,
}

impl CatalogEntry {
    pub fn description(&self, subsystem: Subsystem) -> String {
        (self.description)(subsystem)
    }

    pub fn suggestions(&self, subsystem: Subsystem) -> Vec<String> {
        (self.suggestions)(subsystem)
    }

    /// Extra note for the detailed view when a retry cannot be offered.
    pub fn non_retryable_note(&self) -> Option<&'static str> {
        if self.retryable {
            return None;
        }
        Some(match self.kind {
            ErrorKind::QuotaExhausted => {
                "This error cannot be automatically retried. You'll need to wait for the quota to reset."
            }
            _ => {
                "This error cannot be automatically retried. Please follow the suggestions above or contact support if the issue persists."
            }
        })
    }
}

impl ErrorKind {
    /// The catalog entry for this kind.
    pub fn entry(self) -> &'static CatalogEntry {
        let index = match self {
            Self::QuotaExhausted => 0,
            Self::TokenLimitExceeded => 1,
            Self::AuthenticationError => 2,
            Self::RateLimited => 3,
            Self::NetworkError => 4,
            Self::InvalidRequest => 5,
            Self::UnknownError => 6,
        };
        &CATALOG[index]
    }

    pub fn http_status(self) -> u16 {
        self.entry().http_status
    }

    pub fn is_retryable(self) -> bool {
        self.entry().retryable
    }

    pub fn user_message(self) -> &'static str {
        self.entry().user_message
    }
}

static CATALOG: [CatalogEntry; 7] = [
    CatalogEntry {
        kind: ErrorKind::QuotaExhausted,
        user_message: "You've reached the free quota limit for AI generation. Please try again later or upgrade your plan.",
        http_status: 429,
        retryable: false,
        title: "Quota Limit Reached",
        icon: ErrorIcon::Quota,
        description: quota_description,
        suggestions: quota_suggestions,
    },
    CatalogEntry {
        kind: ErrorKind::TokenLimitExceeded,
        user_message: "Your request is too long. Please try a shorter message or reduce your conversation history.",
        http_status: 400,
        retryable: false,
        title: "Message Too Long",
        icon: ErrorIcon::Warning,
        description: token_limit_description,
        suggestions: token_limit_suggestions,
    },
    CatalogEntry {
        kind: ErrorKind::AuthenticationError,
        user_message: "There's an issue with the API configuration. Please contact support.",
        http_status: 401,
        retryable: false,
        title: "Configuration Problem",
        icon: ErrorIcon::Auth,
        description: auth_description,
        suggestions: auth_suggestions,
    },
    CatalogEntry {
        kind: ErrorKind::RateLimited,
        user_message: "Too many requests. Please wait a moment and try again.",
        http_status: 429,
        retryable: true,
        title: "Too Many Requests",
        icon: ErrorIcon::Quota,
        description: rate_limit_description,
        suggestions: rate_limit_suggestions,
    },
    CatalogEntry {
        kind: ErrorKind::NetworkError,
        user_message: "Network connection error. Please check your connection and try again.",
        http_status: 503,
        retryable: true,
        title: "Connection Problem",
        icon: ErrorIcon::Network,
        description: network_description,
        suggestions: network_suggestions,
    },
    CatalogEntry {
        kind: ErrorKind::InvalidRequest,
        user_message: "Invalid request. Please try again with different input.",
        http_status: 400,
        retryable: false,
        title: "Invalid Request",
        icon: ErrorIcon::Warning,
        description: invalid_request_description,
        suggestions: invalid_request_suggestions,
    },
    CatalogEntry {
        kind: ErrorKind::UnknownError,
        user_message: "An unexpected error occurred. Please try again.",
        http_status: 500,
        retryable: true,
        title: "Something Went Wrong",
        icon: ErrorIcon::Warning,
        description: unknown_description,
        suggestions: unknown_suggestions,
    },
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn quota_description(subsystem: Subsystem) -> String {
    format!(
        "The free quota for {} has been used up. New requests will be accepted once the quota resets.",
        subsystem.label()
    )
}

fn quota_suggestions(subsystem: Subsystem) -> Vec<String> {
    let mut items = owned(&[
        "Wait for the quota to reset, usually within a day",
        "Upgrade your plan for a higher limit",
    ]);
    if subsystem == Subsystem::Illustration {
        items.push("You can keep playing; only the images are paused".to_string());
    }
    items
}

fn token_limit_description(subsystem: Subsystem) -> String {
    match subsystem {
        Subsystem::Narrative => {
            "Your message together with the story so far is longer than the model accepts.".to_string()
        }
        Subsystem::Illustration => {
            "The scene description is longer than the image model accepts.".to_string()
        }
    }
}

fn token_limit_suggestions(subsystem: Subsystem) -> Vec<String> {
    match subsystem {
        Subsystem::Narrative => owned(&[
            "Write a shorter action",
            "Start a new story to clear the conversation history",
        ]),
        Subsystem::Illustration => owned(&["Continue the story; the next scene gets a new image"]),
    }
}

fn auth_description(subsystem: Subsystem) -> String {
    format!(
        "The server could not authenticate with the AI provider for {}.",
        subsystem.label()
    )
}

fn auth_suggestions(_subsystem: Subsystem) -> Vec<String> {
    owned(&[
        "Check that the API key is set and valid",
        "Contact support if the problem continues",
    ])
}

fn rate_limit_description(subsystem: Subsystem) -> String {
    format!(
        "Too many {} requests were sent in a short time.",
        subsystem.label()
    )
}

fn rate_limit_suggestions(_subsystem: Subsystem) -> Vec<String> {
    owned(&[
        "Wait a few seconds before trying again",
        "Avoid sending several actions in quick succession",
    ])
}

fn network_description(subsystem: Subsystem) -> String {
    format!(
        "The connection failed while waiting for {}.",
        subsystem.label()
    )
}

fn network_suggestions(_subsystem: Subsystem) -> Vec<String> {
    owned(&[
        "Check your internet connection",
        "Try again in a few moments",
    ])
}

fn invalid_request_description(subsystem: Subsystem) -> String {
    format!("The request for {} was rejected as invalid.", subsystem.label())
}

fn invalid_request_suggestions(subsystem: Subsystem) -> Vec<String> {
    match subsystem {
        Subsystem::Narrative => owned(&[
            "Rephrase your action",
            "Avoid unusual characters or very long input",
        ]),
        Subsystem::Illustration => owned(&["Continue the story; the next scene gets a new image"]),
    }
}

fn unknown_description(subsystem: Subsystem) -> String {
    format!(
        "An unexpected error occurred with {}. This is usually temporary.",
        subsystem.label()
    )
}

fn unknown_suggestions(_subsystem: Subsystem) -> Vec<String> {
    owned(&[
        "Try again in a few moments",
        "Refresh the page if problems continue",
        "This is usually a temporary issue",
    ])
}
