//! Google Gemini API provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::StoryError;
use crate::models::GoogleModel;
use crate::story::Illustration;
use crate::types::GenerationSettings;

use super::http::{shared_client, status_to_error};
use super::StoryModel;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiProvider {
    text_model: GoogleModel,
    image_model: GoogleModel,
    api_key: String,
    base_url: String,
    settings: GenerationSettings,
}

impl GeminiProvider {
    pub fn new(text_model: GoogleModel, image_model: GoogleModel, api_key: String) -> Self {
        Self {
            text_model,
            image_model,
            api_key,
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            settings: GenerationSettings::default(),
        }
    }

    /// Build from configuration; fails when no API key is configured or the
    /// image model cannot return images.
    pub fn from_config(config: &AppConfig) -> Result<Self, StoryError> {
        let api_key = config.require_api_key()?.to_string();
        if !config.image_model.supports_image_output() {
            return Err(StoryError::Configuration(format!(
                "Model {} cannot generate images",
                config.image_model
            )));
        }
        Ok(Self::new(config.text_model.clone(), config.image_model.clone(), api_key)
            .with_base_url(config.base_url.clone())
            .with_settings(config.generation.clone()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    fn build_text_body(&self, prompt: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
        });
        if let (Some(obj), Some(config)) = (body.as_object_mut(), self.settings.to_gemini_config())
        {
            obj.insert("generationConfig".into(), serde_json::Value::Object(config));
        }
        body
    }

    fn build_image_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {"responseModalities": ["IMAGE"]},
        })
    }

    async fn generate_content(
        &self,
        model: &GoogleModel,
        body: &serde_json::Value,
    ) -> Result<GeminiResponse, StoryError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model.as_str());

        let resp = shared_client()
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl StoryModel for GeminiProvider {
    fn text_model_id(&self) -> &str {
        self.text_model.as_str()
    }

    fn image_model_id(&self) -> &str {
        self.image_model.as_str()
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, StoryError> {
        debug!(model = self.text_model.as_str(), "Gemini generate_text");

        let body = self.build_text_body(prompt);
        let data = self.generate_content(&self.text_model, &body).await?;

        let candidate = data
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| StoryError::api(200, "No candidates in Gemini response"))?;

        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".into());
            return Err(StoryError::api(
                200,
                format!("Gemini returned no text (finish reason {reason})"),
            ));
        }

        Ok(text)
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<Illustration>, StoryError> {
        debug!(model = self.image_model.as_str(), "Gemini generate_image");

        let body = self.build_image_body(prompt);
        let data = self.generate_content(&self.image_model, &body).await?;

        let image = data
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.inline_data)
            .map(|inline| Illustration::new(inline.data, inline.mime_type));

        if image.is_none() {
            debug!(model = self.image_model.as_str(), "Gemini returned no image part");
        }

        Ok(image)
    }
}

// Internal Gemini response types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}
