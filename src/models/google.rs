//! Google Gemini model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Gemini models used for narration and illustration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum GoogleModel {
    #[strum(serialize = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,
    #[strum(serialize = "gemini-2.5-flash")]
    Gemini25Flash,
    #[strum(serialize = "gemini-2.5-pro")]
    Gemini25Pro,
    #[strum(serialize = "gemini-2.0-flash")]
    Gemini20Flash,
    #[strum(serialize = "gemini-2.5-flash-image-preview")]
    Gemini25FlashImagePreview,
    #[strum(serialize = "gemini-2.5-flash-image")]
    Gemini25FlashImage,
    /// Custom/unknown Google model.
    #[strum(default)]
    Custom(String),
}

impl GoogleModel {
    /// Default model for narrative text.
    pub const TEXT_DEFAULT: Self = Self::Gemini25FlashLite;
    /// Default model for illustrations.
    pub const IMAGE_DEFAULT: Self = Self::Gemini25FlashImagePreview;

    pub fn as_str(&self) -> &str {
        match self {
            Self::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Self::Gemini25Flash => "gemini-2.5-flash",
            Self::Gemini25Pro => "gemini-2.5-pro",
            Self::Gemini20Flash => "gemini-2.0-flash",
            Self::Gemini25FlashImagePreview => "gemini-2.5-flash-image-preview",
            Self::Gemini25FlashImage => "gemini-2.5-flash-image",
            Self::Custom(s) => s,
        }
    }

    /// Whether the model can return inline image data.
    pub fn supports_image_output(&self) -> bool {
        match self {
            Self::Gemini25FlashImagePreview | Self::Gemini25FlashImage => true,
            Self::Custom(id) => id.contains("image"),
            _ => false,
        }
    }
}
