//! Infrastructure: configuration loading and logging initialization.

pub mod config;
pub mod logging;

pub use config::{ConfigError, ConfigLoader};
