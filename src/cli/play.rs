//! Terminal game loop.
//!
//! Narrative requests are awaited inline; illustrations run on spawned tasks
//! and are applied whenever they finish, so a slow or failed image never
//! blocks the story.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::warn;

use super::PlayArgs;
use crate::api::GenerateImageResponse;
use crate::client::{
    HttpBackend, IllustrationOutcome, IllustrationTicket, NarrativeOutcome, NarrativeRetry,
    StoryBackend, StorySession,
};
use crate::error::{ErrorRecord, StoryError};
use crate::story::{Role, TurnId};

type IllustrationResult = (IllustrationTicket, Result<GenerateImageResponse, ErrorRecord>);

const HELP: &str = "Commands: /retry  /dismiss  /restart  /help  /quit. Anything else is your action.";

/// Play against the server named in `args`.
pub async fn run(args: PlayArgs) -> Result<(), StoryError> {
    let settings = args.story_settings()?;
    let backend: Arc<dyn StoryBackend> = Arc::new(HttpBackend::new(&args.server));
    let mut game = Game {
        session: StorySession::new(settings),
        backend,
        illustrations: FuturesUnordered::new(),
        image_dir: args.save_images,
    };
    game.play().await
}

struct Game {
    session: StorySession,
    backend: Arc<dyn StoryBackend>,
    illustrations: FuturesUnordered<JoinHandle<IllustrationResult>>,
    image_dir: Option<PathBuf>,
}

impl Game {
    async fn play(&mut self) -> Result<(), StoryError> {
        if let Some(dir) = &self.image_dir {
            tokio::fs::create_dir_all(dir).await?;
        }
        let settings = self.session.settings();
        println!("== {} | {} ==", settings.genre, settings.tone);
        println!("{HELP}");
        println!();

        let outcome = self.session.start(self.backend.as_ref()).await;
        self.show_narrative(outcome);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.handle_line(line.trim()).await {
                        break;
                    }
                }
                Some(joined) = self.illustrations.next(), if !self.illustrations.is_empty() => {
                    match joined {
                        Ok((ticket, result)) => self.apply_illustration(ticket, result).await,
                        Err(e) => warn!(error = %e, "illustration task failed"),
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns `false` when the player quits.
    async fn handle_line(&mut self, line: &str) -> bool {
        match line {
            "/quit" | "/exit" => return false,
            "/help" => println!("{HELP}"),
            "/dismiss" => {
                if !self.session.dismiss() {
                    println!("Nothing to dismiss.");
                }
            }
            "/restart" => {
                let outcome = self.session.start(self.backend.as_ref()).await;
                self.show_narrative(outcome);
            }
            "/retry" => self.retry().await,
            "" if self.session.input().is_empty() => {}
            "" => self.submit().await,
            action => {
                self.session.set_input(action);
                self.submit().await;
            }
        }
        true
    }

    async fn submit(&mut self) {
        let outcome = self.session.submit(self.backend.as_ref()).await;
        if matches!(outcome, NarrativeOutcome::Skipped) {
            println!("Still waiting for the story...");
        }
        self.show_narrative(outcome);
    }

    async fn retry(&mut self) {
        match self.session.retry_narrative() {
            NarrativeRetry::Reissued(ticket) => {
                let outcome = self.session.run_narrative(self.backend.as_ref(), ticket).await;
                self.show_narrative(outcome);
            }
            NarrativeRetry::InputRestored(text) => {
                println!("Your last action was restored: \"{text}\"");
                println!("Press enter to send it again, or type a new action.");
            }
            NarrativeRetry::Unavailable => match self.failed_illustration() {
                Some(turn_id) => {
                    if let Some(ticket) = self.session.retry_illustration(turn_id) {
                        println!("(retrying illustration...)");
                        self.spawn_illustration(ticket);
                    }
                }
                None => println!("Nothing to retry."),
            },
        }
    }

    /// Most recent assistant turn whose illustration failed with a retryable error.
    fn failed_illustration(&self) -> Option<TurnId> {
        self.session
            .conversation()
            .turns()
            .iter()
            .rev()
            .filter(|turn| turn.role() == Role::Assistant)
            .find(|turn| {
                turn.illustration_error()
                    .map(ErrorRecord::is_retryable)
                    .unwrap_or(false)
            })
            .map(|turn| turn.id())
    }

    fn show_narrative(&mut self, outcome: NarrativeOutcome) {
        match outcome {
            NarrativeOutcome::Completed {
                turn_id,
                illustration,
            } => {
                if let Some(turn) = self.session.conversation().get(turn_id) {
                    println!("\n{}\n", turn.content());
                }
                if let Some(ticket) = illustration {
                    println!("(illustrating...)");
                    self.spawn_illustration(ticket);
                }
            }
            NarrativeOutcome::Failed(error) => print_error(&error),
            NarrativeOutcome::Discarded | NarrativeOutcome::Skipped => {}
        }
    }

    fn spawn_illustration(&mut self, ticket: IllustrationTicket) {
        let backend = Arc::clone(&self.backend);
        self.illustrations.push(tokio::spawn(async move {
            let result = backend.generate_image(ticket.request()).await;
            (ticket, result)
        }));
    }

    async fn apply_illustration(
        &mut self,
        ticket: IllustrationTicket,
        result: Result<GenerateImageResponse, ErrorRecord>,
    ) {
        let turn_id = ticket.turn_id();
        match self.session.complete_illustration(ticket, result) {
            IllustrationOutcome::Applied => {
                let illustration = self
                    .session
                    .conversation()
                    .get(turn_id)
                    .and_then(|turn| turn.illustration())
                    .cloned();
                match (illustration, &self.image_dir) {
                    (Some(image), Some(dir)) => match save_image(dir, turn_id, &image).await {
                        Ok(path) => println!("(illustration saved to {})", path.display()),
                        Err(e) => warn!(error = %e, "could not save illustration"),
                    },
                    (Some(image), None) => println!("(illustration ready: {})", image.media_type),
                    (None, _) => println!("(no illustration this time)"),
                }
            }
            IllustrationOutcome::Failed(error) => print_error(&error),
            IllustrationOutcome::Discarded => {}
        }
    }
}

async fn save_image(
    dir: &Path,
    turn_id: TurnId,
    image: &crate::story::Illustration,
) -> Result<PathBuf, StoryError> {
    let bytes = image.decode()?;
    let extension = image
        .media_type
        .rsplit_once('/')
        .map(|(_, ext)| ext)
        .unwrap_or("png");
    let path = dir.join(format!("{turn_id}.{extension}"));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

fn print_error(error: &ErrorRecord) {
    let entry = error.kind().entry();
    eprintln!("\n[{}] {}", error.title(), error.user_message());
    eprintln!("{}", error.description());
    for suggestion in error.suggestions() {
        eprintln!("  - {suggestion}");
    }
    if error.is_retryable() {
        eprintln!("Type /retry to try again, or /dismiss.");
    } else if let Some(note) = entry.non_retryable_note() {
        eprintln!("{note}");
    }
    eprintln!();
}
