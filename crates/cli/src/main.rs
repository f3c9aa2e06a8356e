mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use std::fs::{self, OpenOptions};

use labport_core::config::{self, AppConfig};
use tracing_subscriber::{prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => {
            config::ensure_default_config()?;
            AppConfig::load()?
        }
    };

    match cli.command {
        Commands::Mods => commands::mods(&config)?,
        Commands::Stamp { commit } => commands::stamp(&config, commit)?,
        Commands::Datasets => commands::datasets(&config)?,
        Commands::Packs {
            target,
            reach,
            json,
        } => commands::packs(&config, target.as_deref(), reach, json).await?,
        Commands::Migrate { mods } => commands::migrate(&config, &mods).await?,
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("labport.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
