//! Configuration model.
//!
//! All fixed filesystem roots, GPU defaults and tunables live here and are
//! resolved once at the boundary by the config loader. Scoring logic never
//! reads the process environment ad hoc.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the bounty scorer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Heuristic scoring tunables.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Benchmark pipeline configuration.
    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Heuristic scoring tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoringConfig {
    /// Simulated processing latency before the heuristic arithmetic runs.
    /// Cancellable; tests set this to zero.
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,
}

const fn default_processing_delay_ms() -> u64 {
    45_000
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: default_processing_delay_ms(),
        }
    }
}

/// GPU parameters forwarded to the benchmark toolchain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GpuConfig {
    /// Number of GPUs the toolchain may use.
    #[serde(default = "default_gpu_count")]
    pub count: u32,

    /// Fraction of GPU memory the toolchain may claim, in `(0, 1]`.
    #[serde(default = "default_gpu_memory_fraction")]
    pub memory_fraction: f64,

    /// Device visibility string (e.g. `0` or `0,1`).
    #[serde(default = "default_visible_devices")]
    pub visible_devices: String,
}

const fn default_gpu_count() -> u32 {
    1
}

const fn default_gpu_memory_fraction() -> f64 {
    0.9
}

fn default_visible_devices() -> String {
    "0".to_string()
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            count: default_gpu_count(),
            memory_fraction: default_gpu_memory_fraction(),
            visible_devices: default_visible_devices(),
        }
    }
}

/// Benchmark pipeline configuration.
///
/// `install_path` and `results_path` are relative to `toolchain_root`;
/// together they are the process-wide fixed paths that make concurrent
/// pipeline runs against one root mutually destructive (see the install
/// lock in the benchmark strategy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BenchmarkConfig {
    /// Root of the pre-installed benchmark toolchain.
    #[serde(default = "default_toolchain_root")]
    pub toolchain_root: String,

    /// Toolchain CLI command. Resolved against `toolchain_root` when it
    /// contains a path separator, otherwise looked up on PATH.
    #[serde(default = "default_command")]
    pub command: String,

    /// Directory model snapshots are fetched into.
    #[serde(default = "default_models_dir")]
    pub models_dir: String,

    /// Hub endpoint models are fetched from.
    #[serde(default = "default_hub_endpoint")]
    pub hub_endpoint: String,

    /// Preferred top-level handler filename inside a model snapshot.
    #[serde(default = "default_handler_filename")]
    pub handler_filename: String,

    /// Install target for the handler, relative to `toolchain_root`.
    #[serde(default = "default_install_path")]
    pub install_path: String,

    /// Results table written by `evaluate`, relative to `toolchain_root`.
    #[serde(default = "default_results_path")]
    pub results_path: String,

    /// Benchmark test category passed to the toolchain.
    #[serde(default = "default_category")]
    pub category: String,

    /// Inference backend passed to the toolchain.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// GPU parameters.
    #[serde(default)]
    pub gpu: GpuConfig,
}

fn default_toolchain_root() -> String {
    "/opt/benchmark".to_string()
}

fn default_command() -> String {
    "bench".to_string()
}

fn default_models_dir() -> String {
    ".bounty/models".to_string()
}

fn default_hub_endpoint() -> String {
    "https://huggingface.co".to_string()
}

fn default_handler_filename() -> String {
    "handler.py".to_string()
}

fn default_install_path() -> String {
    "plugins/handler.py".to_string()
}

fn default_results_path() -> String {
    "outputs/results.csv".to_string()
}

fn default_category() -> String {
    "default".to_string()
}

fn default_backend() -> String {
    "transformers".to_string()
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            toolchain_root: default_toolchain_root(),
            command: default_command(),
            models_dir: default_models_dir(),
            hub_endpoint: default_hub_endpoint(),
            handler_filename: default_handler_filename(),
            install_path: default_install_path(),
            results_path: default_results_path(),
            category: default_category(),
            backend: default_backend(),
            gpu: GpuConfig::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty.
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional directory for rolling file output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// File rotation policy: daily, hourly or never.
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
