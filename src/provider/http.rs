//! Shared HTTP client and status helpers.

use std::sync::OnceLock;

use crate::error::StoryError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// No request timeout is set; the transport defaults apply.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Turn a non-success upstream response into an error.
///
/// The body is kept verbatim; classification reads its `error.message`.
pub fn status_to_error(status: u16, body: &str) -> StoryError {
    let body = body.trim();
    if body.is_empty() {
        return StoryError::api(status, format!("upstream returned status {status}"));
    }
    StoryError::api(status, body)
}
