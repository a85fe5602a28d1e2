//! localaid CLI
//!
//! Main entry point for the localaid command-line tool.
//! Ingests a community services CSV and answers questions about it, over
//! HTTP or directly from the shell.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{AskCommand, IngestCommand, ServeCommand};
use localaid_core::logging::{self, LogFormat};
use localaid_core::AppConfig;
use std::path::PathBuf;

/// localaid - plain-language answers from a local services directory
#[derive(Parser, Debug)]
#[command(name = "localaid")]
#[command(about = "Plain-language answers from a local services directory", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (YAML)
    #[arg(short, long, global = true, env = "LOCALAID_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding services.json and index.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Gemini model identifier
    #[arg(short, long, global = true, env = "GEMINI_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Convert the services CSV into the directory files
    Ingest(IngestCommand),

    /// Answer one question from the shell
    Ask(AskCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load configuration from defaults, file and environment
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.data_dir,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
        cli.log_json,
    );
    config.validate().context("Invalid configuration")?;

    let format = if config.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    logging::init_logging(config.log_level.as_deref(), format, config.no_color)?;

    tracing::debug!("Data directory: {:?}", config.data_dir);
    tracing::debug!("Provider: {} / {}", config.provider, config.model);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ingest(_) => "ingest",
        Commands::Ask(_) => "ask",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(config).await,
        Commands::Ingest(cmd) => cmd.execute(&config),
        Commands::Ask(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::debug!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {:#}", e),
    }

    result
}
