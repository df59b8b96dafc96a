//! umptrack - Game fee and mileage tracker for sports officials.
//!
//! This application provides a menu-driven shell for logging games worked,
//! tracking which fees have been paid and how far each venue is from home,
//! and summarizing a season by league.

mod prompt;
mod shell;
mod table;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use umptrack_core::{Config, Database, DistanceMatrixClient, DistanceResolver};

use shell::Shell;

/// Log file name prefix; the appender adds the date
const LOG_FILE_PREFIX: &str = "umptrack.log";

/// Initialize the tracing subscriber for logging.
///
/// Console output goes to stderr so it never interleaves with the shell's
/// tables. When the data directory is available a daily log file is written
/// as well; the returned guard must live until exit to flush it.
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match Config::data_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join("logs"), LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();
    info!("umptrack starting");

    let config = Config::load()?;
    let credentials = config
        .credentials()
        .context("umptrack needs an API key and a home base address to start")?;

    let references = Arc::new(config.references());
    let db = Database::new(config.database_path()?);
    db.initialize()
        .with_context(|| format!("Failed to open database {}", db.path().display()))?;
    info!(
        path = %db.path().display(),
        sites = references.sites.len(),
        leagues = references.leagues.len(),
        "Database ready"
    );

    let client = DistanceMatrixClient::new(credentials.api_key)?;
    let resolver = DistanceResolver::new(client, credentials.home_base, references, db.clone());

    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout(), db, resolver);
    shell.run().await?;

    info!("umptrack shutting down");
    Ok(())
}
