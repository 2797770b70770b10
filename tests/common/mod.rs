//! Shared test helpers: a scripted backend for sessions and a mock model for the server.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use taleweave::api::{
    GenerateImageRequest, GenerateImageResponse, GenerateStoryRequest, GenerateStoryResponse,
};
use taleweave::client::StoryBackend;
use taleweave::error::{ErrorKind, ErrorRecord, StoryError, Subsystem};
use taleweave::provider::StoryModel;
use taleweave::story::Illustration;

/// A backend that replays queued results and records every request.
#[derive(Default)]
pub struct ScriptedBackend {
    stories: Mutex<VecDeque<Result<GenerateStoryResponse, ErrorRecord>>>,
    images: Mutex<VecDeque<Result<GenerateImageResponse, ErrorRecord>>>,
    story_requests: Mutex<Vec<GenerateStoryRequest>>,
    image_requests: Mutex<Vec<GenerateImageRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_story(&self, narrative: &str, image_prompt: &str) {
        self.stories.lock().unwrap().push_back(Ok(GenerateStoryResponse {
            narrative: narrative.to_string(),
            image_prompt: image_prompt.to_string(),
        }));
    }

    pub fn queue_story_error(&self, kind: ErrorKind) {
        self.stories
            .lock()
            .unwrap()
            .push_back(Err(ErrorRecord::new(kind, "scripted failure", Subsystem::Narrative)));
    }

    pub fn queue_image(&self, data: &str) {
        self.images.lock().unwrap().push_back(Ok(GenerateImageResponse {
            image: Some(Illustration::new(data, "image/png")),
        }));
    }

    pub fn queue_image_error(&self, kind: ErrorKind) {
        self.images.lock().unwrap().push_back(Err(ErrorRecord::new(
            kind,
            "scripted failure",
            Subsystem::Illustration,
        )));
    }

    pub fn story_requests(&self) -> Vec<GenerateStoryRequest> {
        self.story_requests.lock().unwrap().clone()
    }

    pub fn image_requests(&self) -> Vec<GenerateImageRequest> {
        self.image_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryBackend for ScriptedBackend {
    async fn generate_story(
        &self,
        request: &GenerateStoryRequest,
    ) -> Result<GenerateStoryResponse, ErrorRecord> {
        self.story_requests.lock().unwrap().push(request.clone());
        self.stories.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ErrorRecord::new(
                ErrorKind::UnknownError,
                "story script exhausted",
                Subsystem::Narrative,
            ))
        })
    }

    async fn generate_image(
        &self,
        request: &GenerateImageRequest,
    ) -> Result<GenerateImageResponse, ErrorRecord> {
        self.image_requests.lock().unwrap().push(request.clone());
        self.images.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ErrorRecord::new(
                ErrorKind::UnknownError,
                "image script exhausted",
                Subsystem::Illustration,
            ))
        })
    }
}

/// A model that returns queued results and records prompts.
#[derive(Default)]
pub struct MockModel {
    texts: Mutex<VecDeque<Result<String, StoryError>>>,
    images: Mutex<VecDeque<Result<Option<Illustration>, StoryError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_text(&self, text: &str) {
        self.texts.lock().unwrap().push_back(Ok(text.to_string()));
    }

    pub fn queue_text_error(&self, error: StoryError) {
        self.texts.lock().unwrap().push_back(Err(error));
    }

    pub fn queue_image(&self, image: Option<Illustration>) {
        self.images.lock().unwrap().push_back(Ok(image));
    }

    pub fn queue_image_error(&self, error: StoryError) {
        self.images.lock().unwrap().push_back(Err(error));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryModel for MockModel {
    fn text_model_id(&self) -> &str {
        "mock-text"
    }

    fn image_model_id(&self) -> &str {
        "mock-image"
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, StoryError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.texts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StoryError::InvalidState("no text queued".into())))
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<Illustration>, StoryError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.images
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StoryError::InvalidState("no image queued".into())))
    }
}
