use anyhow::Result;
use clap::Parser;
use playground_core::Settings;
use std::path::PathBuf;

mod app;
mod commands;
mod session;

#[derive(Parser)]
#[command(name = "playground")]
#[command(about = "LLM Playground - chat with hosted Hugging Face models")]
#[command(version)]
struct Cli {
    /// Run a single prompt and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Model id to use
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum tokens per reply (128-1024)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Hugging Face API token (defaults to the HF_TOKEN environment variable)
    #[arg(long)]
    token: Option<String>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective model and max-token budget back to the config file
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Settings::config_path);
    let mut settings = Settings::load_from(&config_path);

    if let Some(ref model) = cli.model {
        settings.model = model.clone();
        if !settings.models.contains(model) {
            settings.models.push(model.clone());
        }
    }
    if let Some(max_tokens) = cli.max_tokens {
        settings.max_tokens = max_tokens;
    }

    if cli.save_config {
        settings.save_to(&config_path)?;
        tracing::info!(path = %config_path.display(), "saved settings");
    }

    let token = settings.resolve_token(cli.token.as_deref());

    if let Some(prompt) = cli.prompt {
        app::run_single_prompt(&settings, &token, &prompt).await?;
    } else {
        app::run_interactive(settings, token).await?;
    }

    Ok(())
}
