//! CLI entrypoint for agora
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod report;
mod scenario;

use agora_infrastructure::config::FileLoggingConfig;
use agora_infrastructure::{ConfigLoader, FileConfig, PhaseSweeper, Severity};
use anyhow::{Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use commands::{Cli, Command, OutputFormat};
use report::ConsoleFormatter;
use scenario::{Scenario, Session};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        println!("Configuration sources (in priority order):");
        for (label, path, found) in ConfigLoader::config_sources(cli.config.as_deref()) {
            let mark = if found { "FOUND" } else { "     " };
            println!("  [{}] {:<8} {}", mark, format!("{label}:"), path.display());
        }
        println!("  [     ] Default: built-in defaults");
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {e}"))?
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.verbose, &config.logging);

    info!("Starting agora");

    for issue in config.validate() {
        match issue.severity {
            Severity::Warning => warn!("{}", issue),
            Severity::Error => eprintln!("{}", issue),
        }
    }
    if config.has_errors() {
        bail!("Configuration is invalid");
    }

    match cli.command {
        Some(Command::Run { scenario, output }) => run(&config, &scenario, output).await,
        Some(Command::Serve { scenario, interval }) => serve(&config, &scenario, interval).await,
        Some(Command::CheckConfig) => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Initialize logging based on verbosity level, with an optional daily
/// rolling file next to stderr
fn init_tracing(verbose: u8, logging: &FileLoggingConfig) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr);

    match logging.log_directory() {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "agora.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

async fn run(config: &FileConfig, path: &Path, output: OutputFormat) -> Result<()> {
    let scenario = Scenario::from_file(path)?;
    let session = Session::build(config, &scenario, true)?;
    let (id, steps) = session.replay(&scenario).await?;
    let run = session.finish(id, steps).await?;

    let text = match output {
        OutputFormat::Text => ConsoleFormatter::format(&run),
        OutputFormat::Json => ConsoleFormatter::format_json(&run),
    };
    println!("{}", text);
    Ok(())
}

async fn serve(config: &FileConfig, path: &Path, interval: Option<u64>) -> Result<()> {
    let scenario = Scenario::from_file(path)?;
    let session = Session::build(config, &scenario, false)?;
    let (id, steps) = session.replay(&scenario).await?;
    for step in steps.iter().filter(|s| !s.ok) {
        warn!(step = step.index, action = step.action, "{}", step.detail);
    }

    let interval = interval.map_or_else(|| config.sweep.interval(), Duration::from_secs);
    if interval.is_zero() {
        bail!("Sweep interval must be at least one second");
    }
    let cancel = CancellationToken::new();
    let sweeper = PhaseSweeper::new(session.engine.clone(), interval).spawn(cancel.clone());

    println!(
        "Sweeping {} every {}s, press Ctrl-C to stop",
        id,
        interval.as_secs()
    );
    tokio::signal::ctrl_c().await?;
    cancel.cancel();
    let passes = sweeper.await?;

    let run = session.finish(id, steps).await?;
    info!(passes, "Stopped");
    println!("{}", ConsoleFormatter::format(&run));
    Ok(())
}
