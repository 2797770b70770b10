//! Story domain: configuration, prompts and the conversation log.

pub mod conversation;
pub mod prompt;
pub mod settings;

pub use conversation::{Conversation, ConversationTurn, HistoryEntry, Illustration, Role, TurnId};
pub use prompt::{split_narrative, SplitNarrative, IMAGE_MARKER};
pub use settings::{presets, StoryConfiguration};
