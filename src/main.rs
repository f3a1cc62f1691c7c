//! LeadPilot - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use leadpilot::{
    chat::ChatSession,
    cli::{Args, AskArgs, Commands, Config, Verbosity},
    leads::{LeadStore, MockDocumentExtractor},
    repl::{DisplayManager, ReplConfig, ReplSession},
    streaming::{ChatBackend, ChatClient},
    telemetry,
};
use std::sync::Arc;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = args.verbosity();

    if let Err(e) = telemetry::init_logging(verbosity) {
        eprintln!("{} {}", "warning:".yellow(), e);
    }

    if let Commands::Config { init: true } = args.command() {
        return init_config(&args);
    }

    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    if let Some(model) = &args.model {
        config.openrouter.model = model.clone();
    }
    config.validate()?;

    match args.command() {
        Commands::Config { .. } => show_config(&config),
        Commands::Ask(ask) => run_ask(&config, ask, verbosity).await,
        Commands::Start => run_repl(&args, &config, verbosity).await,
    }
}

/// Write a default config file for the user to edit
fn init_config(args: &Args) -> Result<()> {
    let path = args
        .config
        .clone()
        .or_else(Config::default_path)
        .context("Could not determine the home directory")?;

    Config::write_default(&path)?;
    println!("{} {}", "Wrote default configuration to".green(), path.display());
    println!("Set openrouter.api_key there or export {}", leadpilot::cli::config::API_KEY_ENV);
    Ok(())
}

/// Print the effective configuration with the key masked
fn show_config(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(&config.redacted())?;
    println!("{}", "Effective configuration:".bold().cyan());
    println!("{}", rendered);

    let key_source = if std::env::var(leadpilot::cli::config::API_KEY_ENV).is_ok() {
        "environment"
    } else if config.openrouter.api_key.is_some() {
        "config file"
    } else {
        "not set"
    };
    println!("API key: {}", key_source);
    Ok(())
}

/// One-shot question about a lead given on the command line
async fn run_ask(config: &Config, ask: &AskArgs, verbosity: Verbosity) -> Result<()> {
    let client = ChatClient::new(config.chat_client_config())?;
    let lead = ask.target_lead()?;

    let display = if verbosity.show_progress() {
        DisplayManager::new()
    } else {
        DisplayManager::without_progress()
    };
    display.show_chat_header(&lead);

    let mut chat = ChatSession::new(lead);
    let pb = display.spinner("Thinking...");
    let mut started = false;

    let reply = chat
        .ask_streaming(&client, &ask.question, |token| {
            if !started {
                pb.finish_and_clear();
                display.begin_answer();
                started = true;
            }
            display.stream_token(token);
        })
        .await;
    pb.finish_and_clear();
    display.end_answer();

    match reply {
        Some(reply) if !reply.outcome.is_success() => {
            anyhow::bail!("Assistant stream ended with {:?}", reply.outcome.end)
        }
        Some(_) => Ok(()),
        None => anyhow::bail!("Question must not be empty"),
    }
}

/// Interactive REPL
async fn run_repl(args: &Args, config: &Config, verbosity: Verbosity) -> Result<()> {
    let backend: Option<Arc<dyn ChatBackend>> = match ChatClient::new(config.chat_client_config()) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "chat disabled");
            None
        }
    };

    let store = if args.no_samples {
        LeadStore::new()
    } else {
        LeadStore::with_sample_leads()
    };

    let repl_config = ReplConfig {
        history_file: Config::default_path()
            .and_then(|path| path.parent().map(|dir| dir.join("history"))),
        show_progress: verbosity.show_progress(),
        model: config.openrouter.model.clone(),
    };

    let extractor = MockDocumentExtractor::with_delay(config.processing_delay());
    let mut repl = ReplSession::new(repl_config, store, Box::new(extractor), backend);
    repl.run(env!("CARGO_PKG_VERSION")).await
}
