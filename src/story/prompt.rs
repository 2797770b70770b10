//! Deterministic prompt templating.

use super::conversation::HistoryEntry;
use super::settings::StoryConfiguration;

/// Marker line separating narrative from the image directive in model output.
pub const IMAGE_MARKER: &str = "IMAGE: ";

fn preamble(settings: &StoryConfiguration) -> String {
    format!(
        "You are the {} for a {} game in {} style.\n\nThe tone of the narration should be {}.\n\nWrite the narration in the language with code \"{}\".",
        settings.narrator_role, settings.genre, settings.style, settings.tone, settings.language
    )
}

fn image_directive(settings: &StoryConfiguration, scene: &str) -> String {
    format!(
        "IMPORTANT: At the end, ALWAYS include a separate line that starts EXACTLY with \"IMAGE:\" followed by a brief description in English to generate a {} of the {} (maximum 50 words). This line is MANDATORY.",
        settings.image_style, scene
    )
}

/// Prompt for the opening scene of a session.
pub fn initial_prompt(settings: &StoryConfiguration) -> String {
    let phrases = settings.invite_phrases.join(", ");
    format!(
        "{}\n\nGenerate the initial scene where {}. Describe the situation in an immersive and dramatic way in MAXIMUM 2 short paragraphs.\n\nBe concise and direct. Present the current scenario and ALWAYS end by inviting the player to participate actively, asking what they want to do, where they want to go, or what action to take. Use phrases like {} to engage the player.\n\n{}",
        preamble(settings),
        settings.initial_situation,
        phrases,
        image_directive(settings, "initial scene")
    )
}

/// Render history as `role: content` lines.
pub fn history_text(history: &[HistoryEntry]) -> String {
    history
        .iter()
        .map(|entry| format!("{}: {}", entry.role, entry.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt continuing the story after a player action.
pub fn continue_prompt(
    settings: &StoryConfiguration,
    history: &[HistoryEntry],
    user_message: &str,
) -> String {
    let phrases = settings.invite_phrases.join(", ");
    format!(
        "{}\n\nConversation history:\n{}\n\nThe player just said: \"{}\"\n\nContinue the story based on the player's action. Describe the consequences in a dramatic and immersive way in MAXIMUM 2 short paragraphs.\n\nBe concise and direct. Present the new situation and ALWAYS end by inviting the player to participate actively, asking what they want to do, where they want to go, what they observe, or what action to take. Use phrases like {} to keep the player engaged in the adventure.\n\n{}",
        preamble(settings),
        history_text(history),
        user_message,
        phrases,
        image_directive(settings, "new scene")
    )
}

/// Prompt for the image model.
pub fn image_prompt(settings: &StoryConfiguration, description: &str) -> String {
    format!("Generate a {}: {}.", settings.image_style, description)
}

/// Narrative text and image prompt split from one model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitNarrative {
    pub narrative: String,
    pub image_prompt: String,
}

/// Split model output on the first `IMAGE: ` marker.
///
/// Text before the marker is the narrative, text after is the image prompt;
/// both are trimmed. Without a marker the whole text is narrative.
pub fn split_narrative(text: &str) -> SplitNarrative {
    match text.find(IMAGE_MARKER) {
        Some(index) => SplitNarrative {
            narrative: text[..index].trim().to_string(),
            image_prompt: text[index + IMAGE_MARKER.len()..].trim().to_string(),
        },
        None => SplitNarrative {
            narrative: text.trim().to_string(),
            image_prompt: String::new(),
        },
    }
}
