//! Configuration system (layered: code > env > `.env` file).

use std::fmt;
use std::net::SocketAddr;

use crate::error::StoryError;
use crate::models::GoogleModel;
use crate::types::GenerationSettings;

/// Default Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default listen address for the server.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Environment variables searched for the Gemini API key, in order.
const API_KEY_VARS: [&str; 3] = [
    "GEMINI_API_KEY",
    "GOOGLE_API_KEY",
    "GOOGLE_GENERATIVE_AI_API_KEY",
];

/// Runtime configuration for the server and the Gemini provider.
#[derive(Clone)]
pub struct AppConfig {
    api_key: Option<String>,
    pub base_url: String,
    pub text_model: GoogleModel,
    pub image_model: GoogleModel,
    pub addr: SocketAddr,
    pub generation: GenerationSettings,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("addr", &self.addr)
            .field("generation", &self.generation)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    /// Defaults with no API key.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: GoogleModel::TEXT_DEFAULT,
            image_model: GoogleModel::IMAGE_DEFAULT,
            addr: default_addr(),
            generation: GenerationSettings::default(),
        }
    }

    /// Load from environment variables (`.env` is read first if present).
    pub fn from_env() -> Result<Self, StoryError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Used by `from_env` and tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoryError> {
        let mut config = Self::new();

        config.api_key = API_KEY_VARS
            .iter()
            .find_map(|var| lookup(var).filter(|value| !value.trim().is_empty()));

        if let Some(url) = lookup("GEMINI_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("TALEWEAVE_TEXT_MODEL") {
            config.text_model = parse_model(&model)?;
        }
        if let Some(model) = lookup("TALEWEAVE_IMAGE_MODEL") {
            config.image_model = parse_model(&model)?;
        }
        if let Some(addr) = lookup("TALEWEAVE_ADDR") {
            config.addr = parse_addr(&addr)?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The API key, or a configuration error naming the variable to set.
    pub fn require_api_key(&self) -> Result<&str, StoryError> {
        self.api_key().ok_or_else(|| {
            StoryError::Configuration("Missing API key: set GEMINI_API_KEY".into())
        })
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

pub fn parse_model(raw: &str) -> Result<GoogleModel, StoryError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(StoryError::Configuration("Model id must not be empty".into()));
    }
    raw.parse()
        .map_err(|_| StoryError::Configuration(format!("Invalid model id: {raw}")))
}

pub fn parse_addr(raw: &str) -> Result<SocketAddr, StoryError> {
    raw.trim()
        .parse()
        .map_err(|_| StoryError::Configuration(format!("Invalid listen address: {raw}")))
}
