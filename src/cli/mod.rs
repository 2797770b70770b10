//! CLI entry point for Taleweave.

pub mod play;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::StoryError;
use crate::story::{presets, StoryConfiguration};

/// Taleweave text adventure
#[derive(Parser, Debug)]
#[command(name = "taleweave", version, about = "Taleweave: text adventures on Gemini")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the story server
    Serve(ServeArgs),
    /// Play a story against a running server
    Play(PlayArgs),
    /// List the built-in story presets
    Presets,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on (defaults to TALEWEAVE_ADDR or 127.0.0.1:3000)
    #[arg(short, long)]
    pub addr: Option<SocketAddr>,

    /// Gemini model for narrative text
    #[arg(long)]
    pub text_model: Option<String>,

    /// Gemini model for illustrations
    #[arg(long)]
    pub image_model: Option<String>,

    /// Story settings used when an image request carries none (TOML)
    #[arg(long)]
    pub story: Option<PathBuf>,
}

/// Arguments for the `play` subcommand.
#[derive(Parser, Debug)]
pub struct PlayArgs {
    /// Base URL of the story server
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Story settings file (TOML)
    #[arg(long, conflicts_with = "preset")]
    pub story: Option<PathBuf>,

    /// Built-in preset number (see `taleweave presets`)
    #[arg(short, long)]
    pub preset: Option<usize>,

    /// Write received illustrations into this directory
    #[arg(long)]
    pub save_images: Option<PathBuf>,
}

impl PlayArgs {
    /// Resolve the story settings: file, then preset, then a random preset.
    pub fn story_settings(&self) -> Result<StoryConfiguration, StoryError> {
        if let Some(path) = &self.story {
            return StoryConfiguration::from_toml_file(path);
        }
        match self.preset {
            Some(number) => preset_by_number(number),
            None => Ok(StoryConfiguration::random_preset()),
        }
    }
}

/// Look up a preset by its 1-based number as printed by `presets`.
pub fn preset_by_number(number: usize) -> Result<StoryConfiguration, StoryError> {
    let mut all = presets();
    if number == 0 || number > all.len() {
        return Err(StoryError::InvalidArgument(format!(
            "preset must be between 1 and {}",
            all.len()
        )));
    }
    Ok(all.swap_remove(number - 1))
}

/// Print the built-in presets.
pub fn print_presets() {
    for (index, preset) in presets().iter().enumerate() {
        println!("{}. {} ({}, {})", index + 1, preset.genre, preset.style, preset.tone);
        println!("   {}", preset.initial_situation);
    }
}
