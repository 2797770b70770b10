//! Request handlers. Every failure leaves through [`ApiFailure`].

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::debug;

use super::AppState;
use crate::api::{
    GenerateImageRequest, GenerateImageResponse, GenerateStoryRequest, GenerateStoryResponse,
};
use crate::error::{format_error, ErrorKind, ErrorRecord, StoryError, Subsystem};
use crate::story::prompt;

/// A classified failure rendered as `{error, code, retryable}`.
#[derive(Debug)]
pub struct ApiFailure(pub ErrorRecord);

impl ApiFailure {
    fn from_error(error: &StoryError, subsystem: Subsystem) -> Self {
        Self(ErrorRecord::from_error(error, subsystem))
    }

    fn invalid(raw_message: impl Into<String>, subsystem: Subsystem) -> Self {
        Self(ErrorRecord::new(ErrorKind::InvalidRequest, raw_message, subsystem))
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let formatted = format_error(&self.0);
        let status =
            StatusCode::from_u16(formatted.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(formatted.body)).into_response()
    }
}

pub(super) async fn generate_story(
    State(state): State<AppState>,
    payload: Result<Json<GenerateStoryRequest>, JsonRejection>,
) -> Result<Json<GenerateStoryResponse>, ApiFailure> {
    let Json(request) =
        payload.map_err(|rejection| ApiFailure::invalid(rejection.body_text(), Subsystem::Narrative))?;

    let prompt = if request.is_start {
        prompt::initial_prompt(&request.story_settings)
    } else {
        let user_message = request
            .user_message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .ok_or_else(|| {
                ApiFailure::invalid("missing user message for story continuation", Subsystem::Narrative)
            })?;
        prompt::continue_prompt(
            &request.story_settings,
            &request.conversation_history,
            user_message,
        )
    };

    debug!(
        is_start = request.is_start,
        history_len = request.conversation_history.len(),
        "generating story"
    );

    let text = state
        .model
        .generate_text(&prompt)
        .await
        .map_err(|e| ApiFailure::from_error(&e, Subsystem::Narrative))?;

    let split = prompt::split_narrative(&text);
    Ok(Json(GenerateStoryResponse {
        narrative: split.narrative,
        image_prompt: split.image_prompt,
    }))
}

pub(super) async fn generate_image(
    State(state): State<AppState>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Json<GenerateImageResponse>, ApiFailure> {
    let Json(request) = payload
        .map_err(|rejection| ApiFailure::invalid(rejection.body_text(), Subsystem::Illustration))?;

    if request.image_prompt.trim().is_empty() {
        return Err(ApiFailure::invalid(
            "missing image prompt",
            Subsystem::Illustration,
        ));
    }

    let settings = request
        .story_settings
        .as_ref()
        .unwrap_or(state.default_settings.as_ref());
    let prompt = prompt::image_prompt(settings, &request.image_prompt);

    let image = state
        .model
        .generate_image(&prompt)
        .await
        .map_err(|e| ApiFailure::from_error(&e, Subsystem::Illustration))?;

    debug!(has_image = image.is_some(), "generated image");
    Ok(Json(GenerateImageResponse { image }))
}

pub(super) async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
