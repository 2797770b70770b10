//! The closed set of user-facing error kinds and the subsystems they occur in.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Machine-readable error code, sent to clients as `code`.
///
/// Classification is total: every failure maps to exactly one kind, with
/// [`ErrorKind::UnknownError`] as the fallback.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr, EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    QuotaExhausted,
    TokenLimitExceeded,
    AuthenticationError,
    RateLimited,
    NetworkError,
    InvalidRequest,
    UnknownError,
}

impl ErrorKind {
    /// Parse a wire code, mapping anything unrecognised to `UnknownError`.
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or(Self::UnknownError)
    }

    /// Wire code, e.g. `QUOTA_EXHAUSTED`.
    pub fn code(self) -> &'static str {
        self.into()
    }
}

impl<'de> Deserialize<'de> for ErrorKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

/// Which generation path a failure belongs to.
///
/// The two subsystems fail and retry independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Subsystem {
    #[serde(alias = "story")]
    Narrative,
    #[serde(alias = "image")]
    Illustration,
}

impl Subsystem {
    /// Human label used in catalog copy ("story generation", "image generation").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Narrative => "story generation",
            Self::Illustration => "image generation",
        }
    }

    /// Capitalised label for titles.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Narrative => "Story Generation",
            Self::Illustration => "Image Generation",
        }
    }
}
