//! Client side: backend calls and the session/retry coordinator.

pub mod backend;
pub mod session;

pub use backend::{HttpBackend, StoryBackend};
pub use session::{
    IllustrationOutcome, IllustrationTicket, NarrativeOutcome, NarrativeRetry, NarrativeTicket,
    RequestKey, RequestState, SequenceTracker, StorySession,
};
