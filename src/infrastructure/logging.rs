//! Logging initialization using tracing.

use anyhow::{anyhow, Result};
use std::io;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::models::LoggingConfig;

/// Keeps the non-blocking file writer alive for the process lifetime.
pub struct LoggingGuard {
    _guard: Option<WorkerGuard>,
}

/// Initialize the global subscriber from the logging configuration.
///
/// Stdout format follows `config.format`; the optional file output is
/// always JSON. The returned guard must be held until shutdown or
/// buffered file output is lost.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let default_level = parse_log_level(&config.level)?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let guard = if let Some(ref log_dir) = config.log_dir {
        let file_appender = match config.rotation.as_str() {
            "daily" => rolling::daily(log_dir, "bounty-scorer.log"),
            "hourly" => rolling::hourly(log_dir, "bounty-scorer.log"),
            "never" => rolling::never(log_dir, "bounty-scorer.log"),
            other => return Err(anyhow!("invalid log rotation: {other}")),
        };
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking_file)
            .with_ansi(false)
            .with_target(true)
            .with_filter(env_filter.clone());

        let registry = tracing_subscriber::registry().with(file_layer);
        if config.format == "pretty" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(io::stdout)
                        .with_filter(env_filter),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(io::stdout)
                        .with_filter(env_filter),
                )
                .init();
        }
        Some(guard)
    } else {
        if config.format == "pretty" {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(io::stdout)
                        .with_filter(env_filter),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(io::stdout)
                        .with_filter(env_filter),
                )
                .init();
        }
        None
    };

    Ok(LoggingGuard { _guard: guard })
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(anyhow!("invalid log level: {other}")),
    }
}
