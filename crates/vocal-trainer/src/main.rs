//! Vocal Trainer: practice tracks, per-exercise notes and microphone takes
//! from the console.

mod app;
mod app_command;
mod config;
mod console_handler;
mod error;
mod view;

pub(crate) use {
    app::App,
    app_command::{AppCommand, TrackRef},
    console_handler::ConsoleHandler,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "vocal_trainer=info,vocal_trainer_core=info";

/// Vocal exercise trainer.
#[derive(Parser, Debug)]
#[command(name = "vocal-trainer", version, about)]
struct Cli {
    /// Playlist JSON file (overrides the configured path)
    #[arg(short, long)]
    playlist: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = match loaded {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Some(playlist) = cli.playlist {
        config.playlist.path = playlist;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {:?}", e);
        std::process::exit(1);
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let (line_tx, line_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let app = match App::new(config, line_rx, shutdown_tx) {
            Ok(app) => app,
            Err(e) => {
                error!(error = ?e, "Failed to start");
                return;
            }
        };

        let console = ConsoleHandler::new(line_tx);

        tokio::join!(console.run(shutdown_rx), async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        });
    });

    // A console read still blocked on stdin must not hold the process open.
    rt.shutdown_timeout(Duration::from_millis(100));
    info!("Exited");
}
