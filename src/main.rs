//! Lyceum - population runtime for long-lived research agents.
//!
//! Main entry point for the Lyceum CLI.

mod adapters;
mod cli;
mod cmd_agent;
mod cmd_experiment;
mod cmd_run;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lyceum_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use lyceum_store_sqlite::SqliteStore;

use cli::{Cli, Commands};

/// Console plus daily rolling file output.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    std::fs::create_dir_all(&logging.directory).with_context(|| {
        format!("Failed to create log directory {}", logging.directory.display())
    })?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(logging.file_prefix.as_str())
        .filename_suffix("log")
        .max_log_files(logging.max_files)
        .build(&logging.directory)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes pending lines on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match cli.config {
        Some(ref path) => ConfigLoader::load(path)?,
        None => ConfigLoader::load_or_default(&ConfigLoader::default_path())?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli).context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    debug!("Using database {}", config.database.path.display());

    let store = Arc::new(
        SqliteStore::open(&config.database.path)
            .await
            .with_context(|| format!("Failed to open {}", config.database.path.display()))?,
    );

    match cli.command {
        Commands::Run {
            experiment,
            agent,
            forever,
        } => cmd_run::run(&config, store, &experiment, agent.as_deref(), forever).await,
        Commands::Replay {
            experiment,
            agent,
            turn_id,
        } => cmd_run::replay(&config, store, &experiment, &agent, turn_id).await,
        Commands::Experiment { action } => {
            cmd_experiment::handle_experiment_command(&store, action).await
        }
        Commands::Agent { action } => cmd_agent::handle_agent_command(&store, action).await,
    }
}
