//! JSON bodies of the two generation endpoints.
//!
//! Shared by the server handlers and the backend client.

use serde::{Deserialize, Serialize};

use crate::story::{HistoryEntry, Illustration, StoryConfiguration};

pub const STORY_PATH: &str = "/api/generate-story";
pub const IMAGE_PATH: &str = "/api/generate-image";
pub const HEALTH_PATH: &str = "/health";

/// Body of `POST /api/generate-story`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversation_history: Vec<HistoryEntry>,
    #[serde(default)]
    pub is_start: bool,
    pub story_settings: StoryConfiguration,
}

impl GenerateStoryRequest {
    /// Request for the opening scene.
    pub fn start(story_settings: StoryConfiguration) -> Self {
        Self {
            user_message: None,
            conversation_history: Vec::new(),
            is_start: true,
            story_settings,
        }
    }

    /// Request continuing the story with a player action.
    pub fn continuation(
        story_settings: StoryConfiguration,
        conversation_history: Vec<HistoryEntry>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            user_message: Some(user_message.into()),
            conversation_history,
            is_start: false,
            story_settings,
        }
    }
}

/// Success body of `POST /api/generate-story`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryResponse {
    pub narrative: String,
    pub image_prompt: String,
}

/// Body of `POST /api/generate-image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    pub image_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_settings: Option<StoryConfiguration>,
}

/// Success body of `POST /api/generate-image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateImageResponse {
    pub image: Option<Illustration>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::Role;

    #[test]
    fn start_request_wire_shape() {
        let json = serde_json::to_value(GenerateStoryRequest::start(StoryConfiguration::default()))
            .unwrap();
        assert_eq!(json["isStart"], true);
        assert!(json.get("userMessage").is_none());
        assert!(json["storySettings"].get("genre").is_some());
    }

    #[test]
    fn continuation_request_round_trips_history() {
        let request = GenerateStoryRequest::continuation(
            StoryConfiguration::default(),
            vec![HistoryEntry::new(Role::Assistant, "You wake.")],
            "Stand up",
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["conversationHistory"][0]["role"], "assistant");
        assert_eq!(json["userMessage"], "Stand up");
    }

    #[test]
    fn image_response_accepts_null() {
        let response: GenerateImageResponse = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert!(response.image.is_none());
        let response: GenerateImageResponse =
            serde_json::from_str(r#"{"image": {"base64Data": "aGk=", "mediaType": "image/png"}}"#)
                .unwrap();
        assert_eq!(response.image.unwrap().media_type, "image/png");
    }
}
