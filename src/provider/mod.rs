//! Model provider trait and the Gemini implementation.

pub mod google;
pub mod http;

pub use google::GeminiProvider;

use async_trait::async_trait;

use crate::error::StoryError;
use crate::story::Illustration;

/// A hosted model able to narrate and illustrate.
///
/// The server only talks to this trait, so tests can swap in a mock.
#[async_trait]
pub trait StoryModel: Send + Sync {
    /// Model id used for narrative text.
    fn text_model_id(&self) -> &str;

    /// Model id used for illustrations.
    fn image_model_id(&self) -> &str;

    /// Generate narrative text for a prompt.
    async fn generate_text(&self, prompt: &str) -> Result<String, StoryError>;

    /// Generate an illustration. `Ok(None)` when the model returned no image.
    async fn generate_image(&self, prompt: &str) -> Result<Option<Illustration>, StoryError>;
}
