//! HTTP server exposing the story and image endpoints.

mod handlers;

pub use handlers::ApiFailure;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

use crate::api::{HEALTH_PATH, IMAGE_PATH, STORY_PATH};
use crate::error::StoryError;
use crate::provider::StoryModel;
use crate::story::StoryConfiguration;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn StoryModel>,
    /// Used by the image endpoint when a request carries no settings.
    pub default_settings: Arc<StoryConfiguration>,
}

impl AppState {
    pub fn new(model: Arc<dyn StoryModel>) -> Self {
        Self {
            model,
            default_settings: Arc::new(StoryConfiguration::random_preset()),
        }
    }

    pub fn with_default_settings(mut self, settings: StoryConfiguration) -> Self {
        self.default_settings = Arc::new(settings);
        self
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(STORY_PATH, post(handlers::generate_story))
        .route(IMAGE_PATH, post(handlers::generate_image))
        .route(HEALTH_PATH, get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), StoryError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        text_model = state.model.text_model_id(),
        image_model = state.model.image_model_id(),
        "Story server listening on http://{}",
        listener.local_addr()?
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Start the server on a background task.
///
/// Returns the task handle and the bound address, so tests can bind port 0.
pub async fn start_server_on(
    addr: SocketAddr,
    state: AppState,
) -> Result<(JoinHandle<()>, SocketAddr), StoryError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Story server listening on http://{}", actual_addr);

    let app = router(state);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Story server error: {}", e);
        }
    });

    Ok((handle, actual_addr))
}
