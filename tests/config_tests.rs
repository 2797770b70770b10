//! Tests for runtime configuration and story settings files.

use std::io::Write;

use taleweave::config::AppConfig;
use taleweave::error::{ErrorKind, StoryError};
use taleweave::provider::GeminiProvider;
use taleweave::story::{presets, StoryConfiguration};

const STORY_TOML: &str = r#"
genre = "Cosmic horror"
style = "Lovecraftian"
language = "en-US"
tone = "dread-soaked"
narratorRole = "unreliable chronicler"
initialSituation = "the player finds a letter written in their own hand"
invitePhrases = ["What do you do?", "Do you read on?"]
imageStyle = "charcoal sketch"
"#;

#[test]
fn story_settings_load_from_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(STORY_TOML.as_bytes()).unwrap();

    let settings = StoryConfiguration::from_toml_file(file.path()).unwrap();
    assert_eq!(settings.genre, "Cosmic horror");
    assert_eq!(settings.narrator_role, "unreliable chronicler");
    assert_eq!(settings.invite_phrases.len(), 2);
    assert_eq!(settings.image_style, "charcoal sketch");
}

#[test]
fn empty_required_setting_is_rejected() {
    let raw = STORY_TOML.replace("\"Lovecraftian\"", "\"  \"");
    let err = StoryConfiguration::from_toml_str(&raw).unwrap_err();
    assert!(matches!(err, StoryError::InvalidArgument(_)));
    assert!(err.to_string().contains("style"));
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
}

#[test]
fn missing_field_is_a_toml_error() {
    let err = StoryConfiguration::from_toml_str("genre = \"Noir\"").unwrap_err();
    assert!(matches!(err, StoryError::Toml(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = StoryConfiguration::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, StoryError::Io(_)));
}

#[test]
fn presets_are_valid_and_random_preset_is_one_of_them() {
    let all = presets();
    assert_eq!(all.len(), 3);
    for preset in &all {
        preset.validate().unwrap();
    }
    assert!(all.contains(&StoryConfiguration::random_preset()));
    assert_eq!(StoryConfiguration::default(), all[0]);
}

#[test]
fn provider_requires_api_key() {
    let config = AppConfig::from_lookup(|_| None).unwrap();
    let err = GeminiProvider::from_config(&config).err().unwrap();
    assert!(matches!(err, StoryError::Configuration(_)));
    assert_eq!(err.kind(), ErrorKind::AuthenticationError);

    let config = config.with_api_key("secret-key");
    assert!(GeminiProvider::from_config(&config).is_ok());
    assert!(!format!("{config:?}").contains("secret-key"));
}

#[test]
fn provider_rejects_text_only_image_model() {
    let mut config = AppConfig::from_lookup(|_| None)
        .unwrap()
        .with_api_key("secret-key");
    config.image_model = taleweave::config::parse_model("gemini-2.5-flash").unwrap();

    let err = GeminiProvider::from_config(&config).err().unwrap();
    assert!(matches!(err, StoryError::Configuration(_)));
    assert!(err.to_string().contains("gemini-2.5-flash"));

    config.image_model = taleweave::config::parse_model("gemini-2.5-flash-image").unwrap();
    assert!(GeminiProvider::from_config(&config).is_ok());
}
