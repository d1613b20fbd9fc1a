//! CLI entrypoint for Plenary
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use plenary_application::{NoSessionLogger, SessionCoordinator, SessionLogger};
use plenary_infrastructure::{
    ConfigLoader, FileConfig, JsonlSessionLogger, RosterIdentityResolver, RosterLoader,
};
use plenary_presentation::{Cli, OutputConfig, ScriptRunner};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    info!("Starting Plenary");

    let config = load_config(&cli)?;
    config.validate().context("invalid configuration")?;

    let roster = RosterLoader::from_config(&config.roster)?;
    if roster.is_empty() {
        bail!("the roster has no delegates");
    }
    info!("Roster: {}", roster.members().join(", "));

    // === Dependency Injection ===
    let logger: Arc<dyn SessionLogger> = match &config.logging.transcript {
        Some(path) => match JsonlSessionLogger::new(path) {
            Some(logger) => {
                info!("Session transcript: {}", logger.path().display());
                Arc::new(logger)
            }
            None => {
                warn!("Continuing without a session transcript");
                Arc::new(NoSessionLogger)
            }
        },
        None => Arc::new(NoSessionLogger),
    };

    let session =
        SessionCoordinator::with_logger(config.to_session_config(), roster.clone(), logger);
    let identity = Arc::new(RosterIdentityResolver::new(
        &config.session.chair_code,
        roster,
    ));

    let output = OutputConfig::from_cli(&cli);
    let runner = ScriptRunner::new(session, identity, output.formatter()).with_settle(cli.settle);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = runner.run_path(cli.script.as_deref(), &mut out).await?;

    info!(
        "Script finished: {} accepted, {} rejected",
        summary.accepted, summary.rejected
    );
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_tracing(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            builder.with_writer(writer).with_ansi(false).init();
            Ok(Some(guard))
        }
        None => {
            // stdout carries script output
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

/// Merge config sources, then apply command-line overrides
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    if let Some(secs) = cli.auto_close_secs {
        config.session.auto_close_seconds = secs;
    }
    if let Some(path) = &cli.roster {
        config.roster.file = Some(path.clone());
    }
    if let Some(path) = &cli.transcript {
        config.logging.transcript = Some(path.clone());
    }

    Ok(config)
}
