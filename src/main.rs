//! Taleweave CLI binary entry point.

use std::sync::Arc;

use clap::Parser;
use taleweave::cli::{Cli, Commands, ServeArgs};
use taleweave::config::{parse_model, AppConfig};
use taleweave::provider::GeminiProvider;
use taleweave::server::{self, AppState};
use taleweave::story::StoryConfiguration;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::Play(args) => taleweave::cli::play::run(args).await.map_err(Into::into),
        Commands::Presets => {
            taleweave::cli::print_presets();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    if let Some(addr) = args.addr {
        config.addr = addr;
    }
    if let Some(model) = args.text_model {
        config.text_model = parse_model(&model)?;
    }
    if let Some(model) = args.image_model {
        config.image_model = parse_model(&model)?;
    }

    let provider = GeminiProvider::from_config(&config)?;
    let mut state = AppState::new(Arc::new(provider));
    if let Some(path) = args.story {
        state = state.with_default_settings(StoryConfiguration::from_toml_file(path)?);
    }

    server::serve(config.addr, state).await?;
    Ok(())
}
