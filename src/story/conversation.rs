//! Append-only conversation log.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::error::{ErrorRecord, StoryError};

/// Identifier of a conversation turn.
pub type TurnId = Uuid;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A generated image, kept base64 encoded as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Illustration {
    pub base64_data: String,
    pub media_type: String,
}

impl Illustration {
    pub fn new(base64_data: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            base64_data: base64_data.into(),
            media_type: media_type.into(),
        }
    }

    /// Decode the image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, StoryError> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.base64_data)
            .map_err(|e| StoryError::InvalidArgument(format!("invalid image data: {e}")))
    }
}

/// One `{role, content}` pair replayed to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl HistoryEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A single turn of the conversation.
///
/// An assistant turn is either pending an illustration, or has at most one
/// of `illustration` / `illustration_error`; never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    id: TurnId,
    role: Role,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    illustration: Option<Illustration>,
    illustration_pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    illustration_error: Option<ErrorRecord>,
    created_at: DateTime<Utc>,
}

impl ConversationTurn {
    fn new(role: Role, content: String, image_prompt: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            image_prompt,
            illustration: None,
            illustration_pending: false,
            illustration_error: None,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), None)
    }

    /// An assistant turn. An empty image prompt means no illustration.
    pub fn assistant(narrative: impl Into<String>, image_prompt: impl Into<String>) -> Self {
        let image_prompt = image_prompt.into();
        let image_prompt = (!image_prompt.trim().is_empty()).then_some(image_prompt);
        Self::new(Role::Assistant, narrative.into(), image_prompt)
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn image_prompt(&self) -> Option<&str> {
        self.image_prompt.as_deref()
    }

    pub fn illustration(&self) -> Option<&Illustration> {
        self.illustration.as_ref()
    }

    pub fn illustration_pending(&self) -> bool {
        self.illustration_pending
    }

    pub fn illustration_error(&self) -> Option<&ErrorRecord> {
        self.illustration_error.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn mark_illustration_pending(&mut self) {
        self.illustration_pending = true;
        self.illustration_error = None;
    }

    /// Resolve a pending illustration. `None` means the model returned no image.
    pub(crate) fn resolve_illustration(&mut self, illustration: Option<Illustration>) {
        self.illustration_pending = false;
        self.illustration_error = None;
        self.illustration = illustration;
    }

    pub(crate) fn fail_illustration(&mut self, error: ErrorRecord) {
        self.illustration_pending = false;
        self.illustration = None;
        self.illustration_error = Some(error);
    }

    fn history_entry(&self) -> HistoryEntry {
        HistoryEntry::new(self.role, self.content.clone())
    }
}

/// Ordered, append-only log of turns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return its id.
    pub fn push(&mut self, turn: ConversationTurn) -> TurnId {
        let id = turn.id;
        self.turns.push(turn);
        id
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn get(&self, id: TurnId) -> Option<&ConversationTurn> {
        self.turns.iter().find(|turn| turn.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: TurnId) -> Option<&mut ConversationTurn> {
        self.turns.iter_mut().find(|turn| turn.id == id)
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Remove the most recent user turn, returning it.
    pub(crate) fn remove_last_user_turn(&mut self) -> Option<ConversationTurn> {
        let index = self.turns.iter().rposition(|turn| turn.role == Role::User)?;
        Some(self.turns.remove(index))
    }

    /// The whole log as `{role, content}` pairs, in order.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.turns.iter().map(ConversationTurn::history_entry).collect()
    }
}
