//! normqa CLI
//!
//! Main entry point for the normqa command-line tool.
//! Answers natural-language questions about a standards catalog.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, StatsCommand};
use normqa_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// normqa CLI - natural-language questions over a standards catalog
#[derive(Parser, Debug)]
#[command(name = "normqa")]
#[command(about = "Ask natural-language questions about a standards catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the catalog database (standards, committees, embeddings)
    #[arg(short, long, global = true, env = "NORMQA_DB")]
    db: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "NORMQA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Completion provider (ollama, openai, groq)
    #[arg(short, long, global = true, env = "NORMQA_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "NORMQA_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question about the catalog
    Ask(AskCommand),

    /// Show catalog and retrieval index statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.db,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("normqa CLI starting");
    tracing::debug!("Catalog: {:?}", config.db_path);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    // Emit command span
    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
