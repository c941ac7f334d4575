mod console;

use std::{
    error::Error as _,
    fs::{self, OpenOptions},
    io,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};

use cities_core::{
    config::{self, AppConfig},
    dataset, run_session, TurnEngine,
};
use console::{LineInput, Transcript};

/// Play the cities word game against the computer.
#[derive(Debug, Parser)]
#[command(name = "cities")]
struct Args {
    /// City dataset (JSON array); overrides `data_path` from the config.
    data: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let loaded_config = AppConfig::load();
    let mut config = loaded_config.as_ref().cloned().unwrap_or_default();
    if let Some(data) = args.data {
        config.data_path = data;
    }

    init_logging(&config.log_level)?;
    if let Err(err) = &loaded_config {
        warn!("Using default config: {err:#}");
    }
    if let Err(err) = config::ensure_default_config() {
        warn!("Could not write default config: {err:#}");
    }

    let stdout = io::stdout();
    let mut transcript = Transcript::new(stdout.lock());

    let loaded = dataset::load(&config.data_path, config.record_policy);
    if let Some(error) = loaded.error() {
        let reason = match error.source() {
            Some(source) => format!("{error}: {source}"),
            None => error.to_string(),
        };
        transcript.dataset_unavailable(&reason)?;
    }
    let catalog = Arc::new(loaded.into_catalog());

    transcript.greet(catalog.len())?;
    let mut engine = TurnEngine::new(catalog, &config.alphabet);
    let stdin = io::stdin();
    let mut input = LineInput::new(stdin.lock());

    let report = run_session(&mut engine, &mut input, &mut transcript)?;
    transcript.summary(&report)?;
    info!(outcome = ?report.outcome, "exiting");
    Ok(())
}

fn init_logging(default_level: &str) -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("cities.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the game itself, so only warnings go to the terminal.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .with_filter(LevelFilter::WARN);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
