//! Drafter CLI — the main entry point.
//!
//! Runs a drafting session against an OpenAI-compatible chat endpoint:
//! interactive by default, or one-shot with `--message`. The session ends
//! when the document is saved, input closes, or the cycle budget runs out.

use clap::Parser;
use drafter_agent::{DraftSession, ScriptedInput, SessionOutcome};
use drafter_config::AppConfig;
use drafter_tools::DocumentState;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod console;
mod render;

#[derive(Parser)]
#[command(
    name = "drafter",
    about = "Drafter — an AI writing assistant with sandboxed document tools",
    version,
    author
)]
struct Cli {
    /// Send a single message instead of entering interactive mode
    #[arg(short, long)]
    message: Option<String>,

    /// Override the configured model
    #[arg(long)]
    model: Option<String>,

    /// Override the directory documents are saved to and loaded from
    #[arg(long)]
    resources_dir: Option<PathBuf>,

    /// Override the conversation cycle budget
    #[arg(long)]
    max_cycles: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(dir) = cli.resources_dir {
        config.resources_dir = dir;
    }
    if let Some(max) = cli.max_cycles {
        config.max_cycles = max;
    }
    config.validate()?;

    // Check for API key early — give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    DRAFTER_API_KEY   (generic)");
        eprintln!("    GEMINI_API_KEY    (for Gemini's OpenAI-compatible endpoint)");
        eprintln!("    OPENAI_API_KEY    (for OpenAI direct)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let root = drafter_security::ensure_root(&config.resources_dir)
        .map_err(|e| format!("Failed to prepare resources directory: {e}"))?;

    let provider = drafter_providers::build_from_config(&config)?;
    let document = DocumentState::new();
    let tools = Arc::new(drafter_tools::default_registry(
        document.clone(),
        &root,
        &config.catalog_url,
    )?);

    let session = DraftSession::new(provider, &config.model, tools, document)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_max_cycles(config.max_cycles)
        .with_model_timeout(Duration::from_secs(config.model_timeout_secs));

    let report = if let Some(message) = cli.message {
        println!("\n ===== DRAFTER =====");
        let mut input = ScriptedInput::new([message]);
        session.run(&mut input, render::print_message).await?
    } else {
        println!("\n ===== DRAFTER =====");
        println!("  Model:     {}", config.model);
        println!("  Documents: {}", root.display());
        println!("  Type your message and press Enter. 'exit' or Ctrl+D to quit.");

        let mut input = console::ConsoleInput::new();
        session.run(&mut input, render::print_message).await?
    };

    match report.outcome {
        SessionOutcome::Saved => println!("\n ===== DRAFTER FINISHED ====="),
        SessionOutcome::InputClosed => println!("\n Goodbye! 👋"),
        SessionOutcome::BudgetExhausted => {
            eprintln!(
                "\n Session ended after reaching the {}-cycle limit without a save.",
                report.cycles
            );
        }
    }

    Ok(())
}
