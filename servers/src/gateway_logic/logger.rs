//! Logging setup for the gateway binary.
//!
//! Logs go to both stdout (human-readable, ANSI) and a daily rotating
//! JSON file. The non-blocking worker guard is handed back to `main` so
//! buffered records are flushed when the process winds down.

use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::gateway_logic::config::Config;

pub fn setup_logging(config: &Config) -> io::Result<WorkerGuard> {
    let log_level = config.log_level.clone().unwrap_or_else(|| "info".to_string());
    let log_dir = config
        .log_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("logs"));

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "server_gateway");
    let (non_blocking_appender, guard) = non_blocking(file_appender);

    // Console layer for stdout, file layer as structured JSON.
    let console_layer = fmt::layer().with_target(true).with_ansi(true);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_appender)
        .json();

    // RUST_LOG wins over the configured level.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_level))
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
