//! Story configuration and built-in presets.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoryError;

/// Everything that shapes the prompts for one game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryConfiguration {
    pub genre: String,
    pub style: String,
    pub language: String,
    pub tone: String,
    pub narrator_role: String,
    pub initial_situation: String,
    pub invite_phrases: Vec<String>,
    pub image_style: String,
}

impl Default for StoryConfiguration {
    fn default() -> Self {
        presets().swap_remove(0)
    }
}

impl StoryConfiguration {
    /// Load a configuration from a TOML file.
    ///
    /// Keys use the same camelCase names as the JSON wire format.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, StoryError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, StoryError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would produce empty prompt sections.
    pub fn validate(&self) -> Result<(), StoryError> {
        let required = [
            ("genre", &self.genre),
            ("style", &self.style),
            ("tone", &self.tone),
            ("narratorRole", &self.narrator_role),
            ("initialSituation", &self.initial_situation),
            ("imageStyle", &self.image_style),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(StoryError::InvalidArgument(format!(
                    "story setting '{name}' must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Pick one of the built-in presets at random.
    pub fn random_preset() -> Self {
        let mut all = presets();
        let index = (rand_factor() * all.len() as f64) as usize;
        all.swap_remove(index.min(all.len() - 1))
    }
}

/// Built-in story presets.
pub fn presets() -> Vec<StoryConfiguration> {
    vec![
        StoryConfiguration {
            genre: "Pandemic Survival-Horror".into(),
            style: "Pixel Art".into(),
            language: "en".into(),
            tone: "gritty, somber, desperate".into(),
            narrator_role: "solemn guide chronicling the fall of humanity".into(),
            initial_situation: "The player is a virologist who has just discovered the true nature of the 'COVID-24' virus: it doesn't just kill, it reanimates. The world has fallen, and they find themselves isolated in their ruined lab, surrounded by the infected.".into(),
            invite_phrases: vec![
                "What do you test?".into(),
                "Where do you seek refuge?".into(),
                "How do you prepare for the horde?".into(),
            ],
            image_style: "pixel art, 16:9 aspect ratio, 8-bit retro gaming aesthetics, limited dark color palette, landscape format, clear definition, depicting a ruined city or lab".into(),
        },
        StoryConfiguration {
            genre: "Epic Fantasy Adventure".into(),
            style: "Digital Painting".into(),
            language: "en".into(),
            tone: "epic, grand, adventurous".into(),
            narrator_role: "ancient sage narrating a legend".into(),
            initial_situation: "The player awakens in the enchanted realm of Eldoria, their memories gone. They are found by a young sorceress who reveals that the legendary 'Crimson Dragon' has returned, corrupting the land and threatening to consume all magic.".into(),
            invite_phrases: vec![
                "What ancient artifact do you seek?".into(),
                "Where do you journey to gather allies?".into(),
                "What forgotten spell do you try to remember?".into(),
            ],
            image_style: "digital painting style, vibrant and luminous colors, fantasy landscape with mountains and dragons, magical elements like glowing runes or spells, 16:9 aspect ratio".into(),
        },
        StoryConfiguration {
            genre: "Cyberpunk Mystery".into(),
            style: "Neon Noir".into(),
            language: "en".into(),
            tone: "noir, tense, high-tech".into(),
            narrator_role: "hardboiled detective recounting a case".into(),
            initial_situation: "The player is a disgraced cyber-detective in Neo-Kyoto, a city where humanity is ruled by rogue AIs. A new series of murders has begun, each victim a prominent tech executive, and the only clues are strange, encrypted data streams that lead to the city's deepest secrets.".into(),
            invite_phrases: vec![
                "What system do you hack for clues?".into(),
                "Which neon-lit alley do you investigate?".into(),
                "What informant do you trust to help you?".into(),
            ],
            image_style: "cyberpunk pixel art, 16:9 ratio, dark and moody neon colors, rainy streets, futuristic cityscapes, androids, and complex data visuals".into(),
        },
    ]
}

/// Pseudo-random factor in [0, 1).
fn rand_factor() -> f64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .hash(&mut hasher);
    std::thread::current().id().hash(&mut hasher);

    (hasher.finish() % 10_000) as f64 / 10_000.0
}
