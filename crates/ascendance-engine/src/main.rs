//! Headless engine for the Ascendance simulation.
//!
//! Plays the game in a terminal: the frame loop ticks the store at a fixed
//! rate, every change is autosaved, and each line on standard input is one
//! UI action (`help` lists them).
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `ascendance-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load the save, crediting offline progress
//! 4. Spawn the console reader
//! 5. Run the frame loop until `quit` or Ctrl-C
//! 6. Save one final time

mod console;
mod driver;
mod error;

use std::path::Path;
use std::time::Duration;

use ascendance_core::clock::SystemClock;
use ascendance_core::config::GameConfig;
use ascendance_core::{GameStore, offline};
use ascendance_save::{FileSaveStore, load_state};
use ascendance_types::GameStatus;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::driver::Driver;
use crate::error::EngineError;

/// Path of the optional configuration file, relative to the working directory.
const CONFIG_PATH: &str = "ascendance-config.yaml";

/// Buffered console lines waiting for the frame loop.
const COMMAND_BUFFER: usize = 32;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if the configuration or an existing save cannot be read.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        frame_interval_ms = config.engine.frame_interval_ms,
        auto_start = config.engine.auto_start,
        offline_threshold_seconds = config.offline.threshold_seconds,
        save_directory = %config.save.directory.display(),
        "ascendance-engine starting"
    );

    // 3. Load the save.
    let saves = FileSaveStore::new(&config.save.directory);
    let mut store = load_store(&saves, &config)?;

    if let Some(gains) = &store.state().offline_gains {
        println!(
            "Welcome back. The simulation continued for {} while you were away.",
            offline::format_elapsed(gains.elapsed_seconds)
        );
    }
    if config.engine.auto_start {
        match store.state().status {
            GameStatus::Landing => {
                store.initialize();
                store.start();
            }
            GameStatus::Ready => store.start(),
            GameStatus::Playing | GameStatus::Paused => {}
        }
    }

    // 4. Console reader.
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    tokio::spawn(read_console(tx));
    println!("{}", console::HELP);

    // 5. Frame loop.
    let driver = Driver::new(store, saves, config.save.key.clone());
    let frame_interval = Duration::from_millis(config.engine.frame_interval_ms.max(1));
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    let driver = driver::run(driver, frame_interval, rx, shutdown).await;

    // 6. The loop saved on the way out.
    info!(
        population = %driver.store().state().resources.population,
        "ascendance-engine shutdown complete"
    );
    Ok(())
}

/// Load `ascendance-config.yaml`, falling back to defaults when absent.
fn load_config() -> Result<GameConfig, EngineError> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        Ok(GameConfig::from_file(path)?)
    } else {
        Ok(GameConfig::parse("")?)
    }
}

/// Restore the saved game, or start a fresh one when there is no save.
fn load_store(
    saves: &FileSaveStore,
    config: &GameConfig,
) -> Result<GameStore<SystemClock>, EngineError> {
    match load_state(saves, &config.save.key)? {
        Some(state) => {
            info!(era = state.era.number(), status = ?state.status, "Save loaded");
            Ok(GameStore::restore(
                state,
                SystemClock,
                config.offline.threshold_seconds,
            ))
        }
        None => {
            info!("No save found, starting a new game");
            Ok(GameStore::new())
        }
    }
}

/// Forward standard input to the frame loop line by line.
async fn read_console(tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Console read failed");
                break;
            }
        }
    }
}
