//! `tbsign`: automated daily check-in for subscribed forums.
//!
//! The CLI is the UI layer: it owns rendering and the abort trigger, and
//! drives the orchestrator in `tbsign-batch` for everything else.

mod commands;

use clap::{Parser, Subcommand};
use tbsign_core::load_app_config;

#[derive(Debug, Parser)]
#[command(name = "tbsign")]
#[command(about = "Automated daily check-in for subscribed forums")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check in to every subscribed forum now.
    Run,
    /// Check in only if the automatic-run gate says a run is due today.
    Auto,
    /// Re-attempt a single forum.
    Retry { forum: String },
    /// Show today's recorded outcomes and the previous run's state.
    Status,
    /// Show or edit preferences.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the current preferences.
    Show,
    /// Set the cooldown between check-in requests, in milliseconds.
    SetInterval { ms: u64 },
    /// Enable or disable the automatic run at startup.
    SetAutoRun { enabled: bool },
    /// Set the widget position, in viewport percentages.
    SetWidgetPos { x: f64, y: f64 },
    /// Never check in to this forum (counts as failed).
    BlacklistAdd { forum: String },
    /// Remove a forum from the blacklist.
    BlacklistRemove { forum: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run => commands::run(&config, false).await,
        Commands::Auto => commands::run(&config, true).await,
        Commands::Retry { forum } => commands::retry(&config, &forum).await,
        Commands::Status => commands::status(&config),
        Commands::Config { action } => commands::config(&config, &action),
    }
}
