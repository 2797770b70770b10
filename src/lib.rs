//! Taleweave: an LLM-driven text adventure on Gemini.
//!
//! The server turns story settings and a conversation into narrative text
//! plus an image prompt, and image prompts into illustrations. Every failure
//! is classified into a closed set of [`error::ErrorKind`]s with fixed user
//! copy, an HTTP status and a retry flag. The client side keeps the
//! conversation in a [`client::StorySession`] that applies responses in
//! order and retries failed turns without duplicating them.
//!
//! # Quick Start
//!
//! ```no_run
//! use taleweave::client::{HttpBackend, NarrativeOutcome, StorySession};
//! use taleweave::story::StoryConfiguration;
//!
//! # async fn example() {
//! let backend = HttpBackend::new("http://127.0.0.1:3000");
//! let mut session = StorySession::new(StoryConfiguration::default());
//!
//! if let NarrativeOutcome::Failed(error) = session.start(&backend).await {
//!     eprintln!("{}: {}", error.title(), error.user_message());
//! }
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod server;
pub mod story;
pub mod types;
