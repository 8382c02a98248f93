//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid gpu count: {0}. Must be at least 1")]
    InvalidGpuCount(u32),

    #[error("Invalid gpu memory fraction: {0}. Must be in (0, 1]")]
    InvalidGpuMemoryFraction(f64),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. bounty.yaml in the working directory
    /// 3. Environment variables (`BOUNTY_*` prefix, `__` section separator)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("bounty.yaml"))
            .merge(Env::prefixed("BOUNTY_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("BOUNTY_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        let benchmark = &config.benchmark;
        if benchmark.toolchain_root.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "benchmark toolchain_root cannot be empty".to_string(),
            ));
        }
        if benchmark.command.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "benchmark command cannot be empty".to_string(),
            ));
        }
        if benchmark.models_dir.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "benchmark models_dir cannot be empty".to_string(),
            ));
        }
        if benchmark.handler_filename.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "benchmark handler_filename cannot be empty".to_string(),
            ));
        }
        for (name, path) in [
            ("install_path", &benchmark.install_path),
            ("results_path", &benchmark.results_path),
        ] {
            if path.is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "benchmark {name} cannot be empty"
                )));
            }
            if std::path::Path::new(path).is_absolute() {
                return Err(ConfigError::ValidationFailed(format!(
                    "benchmark {name} must be relative to toolchain_root, got {path}"
                )));
            }
        }

        let gpu = &benchmark.gpu;
        if gpu.count == 0 {
            return Err(ConfigError::InvalidGpuCount(gpu.count));
        }
        if gpu.memory_fraction <= 0.0 || gpu.memory_fraction > 1.0 {
            return Err(ConfigError::InvalidGpuMemoryFraction(gpu.memory_fraction));
        }

        Ok(())
    }
}
