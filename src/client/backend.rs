//! Calls to the story server, with failures already classified.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{
    GenerateImageRequest, GenerateImageResponse, GenerateStoryRequest, GenerateStoryResponse,
    IMAGE_PATH, STORY_PATH,
};
use crate::error::{ErrorRecord, ErrorResponse, Subsystem};

/// The two generation endpoints as seen from a client.
///
/// Errors are [`ErrorRecord`]s: the client never sees raw upstream text.
#[async_trait]
pub trait StoryBackend: Send + Sync {
    async fn generate_story(
        &self,
        request: &GenerateStoryRequest,
    ) -> Result<GenerateStoryResponse, ErrorRecord>;

    async fn generate_image(
        &self,
        request: &GenerateImageRequest,
    ) -> Result<GenerateImageResponse, ErrorRecord>;
}

/// [`StoryBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: crate::provider::http::shared_client().clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, path: &str, body: &B, subsystem: Subsystem) -> Result<R, ErrorRecord>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, %subsystem, "posting to story server");

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, %subsystem, "story server unreachable");
                ErrorRecord::transport_failure(e.to_string(), subsystem)
            })?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            return Err(match resp.json::<ErrorResponse>().await {
                Ok(response) => ErrorRecord::from_response(response, status, subsystem),
                Err(_) => ErrorRecord::unreadable_response(status, subsystem),
            });
        }

        resp.json::<R>().await.map_err(|e| {
            warn!(error = %e, %subsystem, "unreadable success response");
            ErrorRecord::transport_failure(format!("unreadable success response: {e}"), subsystem)
        })
    }
}

#[async_trait]
impl StoryBackend for HttpBackend {
    async fn generate_story(
        &self,
        request: &GenerateStoryRequest,
    ) -> Result<GenerateStoryResponse, ErrorRecord> {
        self.post(STORY_PATH, request, Subsystem::Narrative).await
    }

    async fn generate_image(
        &self,
        request: &GenerateImageRequest,
    ) -> Result<GenerateImageResponse, ErrorRecord> {
        self.post(IMAGE_PATH, request, Subsystem::Illustration).await
    }
}
