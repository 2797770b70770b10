//! Client-side game session and retry coordination.
//!
//! A [`StorySession`] owns the conversation and drives two independent
//! request flows: narrative (one at a time) and illustration (one per
//! assistant turn). Each flow is split into `begin_*`, which mutates state
//! and returns a ticket carrying the request, and `complete_*`, which applies
//! the response. Callers may run ticket requests concurrently; responses are
//! applied only when their ticket is still the latest for its key.

use std::collections::HashMap;

use tracing::debug;

use super::backend::StoryBackend;
use crate::api::{GenerateImageRequest, GenerateImageResponse, GenerateStoryRequest, GenerateStoryResponse};
use crate::error::{ErrorRecord, StoryError};
use crate::story::{Conversation, ConversationTurn, StoryConfiguration, TurnId};

/// State of one request flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Success,
    Failed(ErrorRecord),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn error(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Failed(record) => Some(record),
            _ => None,
        }
    }
}

/// Key under which request sequence numbers are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Narrative,
    Illustration(TurnId),
}

/// Monotonic sequence numbers per request key.
#[derive(Debug, Default)]
pub struct SequenceTracker {
    next: u64,
    latest: HashMap<RequestKey, u64>,
}

impl SequenceTracker {
    /// Issue a new sequence number for `key`, superseding earlier ones.
    pub fn issue(&mut self, key: RequestKey) -> u64 {
        self.next += 1;
        self.latest.insert(key, self.next);
        self.next
    }

    /// Whether `seq` is the latest number issued for `key` and not yet applied.
    pub fn is_current(&self, key: RequestKey, seq: u64) -> bool {
        self.latest.get(&key) == Some(&seq)
    }

    /// Number of keys with a request in flight.
    pub fn in_flight(&self) -> usize {
        self.latest.len()
    }

    /// Retire `key` once its latest response has been applied.
    pub fn forget(&mut self, key: RequestKey) {
        self.latest.remove(&key);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NarrativeAction {
    Start,
    Continue { user_turn: TurnId },
}

/// An issued narrative request.
#[derive(Debug, Clone)]
pub struct NarrativeTicket {
    seq: u64,
    action: NarrativeAction,
    request: GenerateStoryRequest,
}

impl NarrativeTicket {
    pub fn request(&self) -> &GenerateStoryRequest {
        &self.request
    }

    pub fn is_start(&self) -> bool {
        self.action == NarrativeAction::Start
    }
}

/// An issued illustration request for one turn.
#[derive(Debug, Clone)]
pub struct IllustrationTicket {
    seq: u64,
    turn_id: TurnId,
    request: GenerateImageRequest,
}

impl IllustrationTicket {
    pub fn turn_id(&self) -> TurnId {
        self.turn_id
    }

    pub fn request(&self) -> &GenerateImageRequest {
        &self.request
    }
}

/// Result of applying a narrative response.
#[derive(Debug)]
pub enum NarrativeOutcome {
    /// An assistant turn was appended. Carries its illustration request, if any.
    Completed {
        turn_id: TurnId,
        illustration: Option<IllustrationTicket>,
    },
    Failed(ErrorRecord),
    /// The response belonged to a superseded or already applied request and was dropped.
    Discarded,
    /// Nothing was sent (blank input, or a narrative request already pending).
    Skipped,
}

/// Result of applying an illustration response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllustrationOutcome {
    Applied,
    Failed(ErrorRecord),
    /// Superseded, already applied, or the turn is gone.
    Discarded,
}

/// What a narrative retry did.
#[derive(Debug)]
pub enum NarrativeRetry {
    /// The session start was issued again.
    Reissued(NarrativeTicket),
    /// The failed user turn was removed and its text put back in the input.
    InputRestored(String),
    /// No retryable narrative failure to act on.
    Unavailable,
}

/// One game session: configuration, conversation, input and request flows.
#[derive(Debug)]
pub struct StorySession {
    settings: StoryConfiguration,
    conversation: Conversation,
    input: String,
    narrative: RequestState,
    failed_action: Option<NarrativeAction>,
    sequences: SequenceTracker,
}

impl StorySession {
    pub fn new(settings: StoryConfiguration) -> Self {
        Self {
            settings,
            conversation: Conversation::new(),
            input: String::new(),
            narrative: RequestState::Idle,
            failed_action: None,
            sequences: SequenceTracker::default(),
        }
    }

    pub fn settings(&self) -> &StoryConfiguration {
        &self.settings
    }

    /// Replace the configuration. Only allowed before the story has started.
    pub fn set_settings(&mut self, settings: StoryConfiguration) -> Result<(), StoryError> {
        if !self.conversation.is_empty() || self.narrative.is_pending() {
            return Err(StoryError::InvalidState(
                "story settings can only change before the session starts".into(),
            ));
        }
        self.settings = settings;
        Ok(())
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn sequences(&self) -> &SequenceTracker {
        &self.sequences
    }

    pub fn narrative_state(&self) -> &RequestState {
        &self.narrative
    }

    /// Whether input should be disabled.
    pub fn is_loading(&self) -> bool {
        self.narrative.is_pending()
    }

    /// Begin (or restart) the story.
    pub fn begin_start(&mut self) -> Option<NarrativeTicket> {
        if self.narrative.is_pending() {
            return None;
        }
        let request = GenerateStoryRequest::start(self.settings.clone());
        Some(self.issue_narrative(NarrativeAction::Start, request))
    }

    /// Submit the current input as a player action.
    ///
    /// The user turn is appended immediately; history sent to the server is
    /// the conversation as it stood before this turn.
    pub fn begin_submit(&mut self) -> Option<NarrativeTicket> {
        if self.narrative.is_pending() || self.input.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.input);
        let history = self.conversation.history();
        let user_turn = self.conversation.push(ConversationTurn::user(text.clone()));

        let request = GenerateStoryRequest::continuation(self.settings.clone(), history, text);
        Some(self.issue_narrative(NarrativeAction::Continue { user_turn }, request))
    }

    fn issue_narrative(&mut self, action: NarrativeAction, request: GenerateStoryRequest) -> NarrativeTicket {
        self.narrative = RequestState::Pending;
        self.failed_action = None;
        let seq = self.sequences.issue(RequestKey::Narrative);
        NarrativeTicket { seq, action, request }
    }

    /// Apply the response to a narrative request.
    pub fn complete_narrative(
        &mut self,
        ticket: NarrativeTicket,
        result: Result<GenerateStoryResponse, ErrorRecord>,
    ) -> NarrativeOutcome {
        if !self.sequences.is_current(RequestKey::Narrative, ticket.seq) {
            debug!(seq = ticket.seq, "discarding superseded narrative response");
            return NarrativeOutcome::Discarded;
        }
        self.sequences.forget(RequestKey::Narrative);

        match result {
            Ok(response) => {
                if ticket.action == NarrativeAction::Start {
                    self.conversation = Conversation::new();
                }
                let turn = ConversationTurn::assistant(response.narrative, response.image_prompt);
                let turn_id = self.conversation.push(turn);
                self.narrative = RequestState::Success;
                let illustration = self.begin_illustration(turn_id);
                NarrativeOutcome::Completed {
                    turn_id,
                    illustration,
                }
            }
            Err(record) => {
                self.narrative = RequestState::Failed(record.clone());
                self.failed_action = Some(ticket.action);
                NarrativeOutcome::Failed(record)
            }
        }
    }

    /// Retry the failed narrative request, if its error allows it.
    pub fn retry_narrative(&mut self) -> NarrativeRetry {
        let retryable = self
            .narrative
            .error()
            .map(ErrorRecord::is_retryable)
            .unwrap_or(false);
        if !retryable {
            return NarrativeRetry::Unavailable;
        }

        match self.failed_action.take() {
            Some(NarrativeAction::Continue { user_turn }) => {
                let restored = match self.conversation.remove_last_user_turn() {
                    Some(turn) => {
                        debug_assert_eq!(turn.id(), user_turn);
                        turn.content().to_string()
                    }
                    None => String::new(),
                };
                self.input = restored.clone();
                self.narrative = RequestState::Idle;
                NarrativeRetry::InputRestored(restored)
            }
            Some(NarrativeAction::Start) | None => match self.begin_start() {
                Some(ticket) => NarrativeRetry::Reissued(ticket),
                None => NarrativeRetry::Unavailable,
            },
        }
    }

    /// Dismiss a narrative failure without retrying.
    pub fn dismiss(&mut self) -> bool {
        if self.narrative.error().is_none() {
            return false;
        }
        self.narrative = RequestState::Idle;
        self.failed_action = None;
        true
    }

    fn begin_illustration(&mut self, turn_id: TurnId) -> Option<IllustrationTicket> {
        let turn = self.conversation.get_mut(turn_id)?;
        let image_prompt = turn.image_prompt()?.to_string();
        turn.mark_illustration_pending();

        let seq = self.sequences.issue(RequestKey::Illustration(turn_id));
        Some(IllustrationTicket {
            seq,
            turn_id,
            request: GenerateImageRequest {
                image_prompt,
                story_settings: Some(self.settings.clone()),
            },
        })
    }

    /// Apply the response to an illustration request.
    ///
    /// Only the ticket's turn is touched; narrative state is never affected.
    pub fn complete_illustration(
        &mut self,
        ticket: IllustrationTicket,
        result: Result<GenerateImageResponse, ErrorRecord>,
    ) -> IllustrationOutcome {
        let key = RequestKey::Illustration(ticket.turn_id);
        if !self.sequences.is_current(key, ticket.seq) {
            debug!(turn = %ticket.turn_id, seq = ticket.seq, "discarding superseded illustration response");
            return IllustrationOutcome::Discarded;
        }
        self.sequences.forget(key);
        let Some(turn) = self.conversation.get_mut(ticket.turn_id) else {
            debug!(turn = %ticket.turn_id, "discarding illustration for a turn no longer in the conversation");
            return IllustrationOutcome::Discarded;
        };

        match result {
            Ok(response) => {
                turn.resolve_illustration(response.image);
                IllustrationOutcome::Applied
            }
            Err(record) => {
                turn.fail_illustration(record.clone());
                IllustrationOutcome::Failed(record)
            }
        }
    }

    /// Retry a failed illustration for one turn.
    pub fn retry_illustration(&mut self, turn_id: TurnId) -> Option<IllustrationTicket> {
        let retryable = self
            .conversation
            .get(turn_id)?
            .illustration_error()
            .map(ErrorRecord::is_retryable)
            .unwrap_or(false);
        if !retryable {
            return None;
        }
        self.begin_illustration(turn_id)
    }

    /// Start the story and wait for the narrative.
    pub async fn start(&mut self, backend: &dyn StoryBackend) -> NarrativeOutcome {
        match self.begin_start() {
            Some(ticket) => self.run_narrative(backend, ticket).await,
            None => NarrativeOutcome::Skipped,
        }
    }

    /// Submit the current input and wait for the narrative.
    pub async fn submit(&mut self, backend: &dyn StoryBackend) -> NarrativeOutcome {
        match self.begin_submit() {
            Some(ticket) => self.run_narrative(backend, ticket).await,
            None => NarrativeOutcome::Skipped,
        }
    }

    /// Send an issued narrative request and apply its response.
    pub async fn run_narrative(
        &mut self,
        backend: &dyn StoryBackend,
        ticket: NarrativeTicket,
    ) -> NarrativeOutcome {
        let result = backend.generate_story(ticket.request()).await;
        self.complete_narrative(ticket, result)
    }

    /// Send an illustration request and apply its response.
    pub async fn illustrate(
        &mut self,
        backend: &dyn StoryBackend,
        ticket: IllustrationTicket,
    ) -> IllustrationOutcome {
        let result = backend.generate_image(ticket.request()).await;
        self.complete_illustration(ticket, result)
    }
}
