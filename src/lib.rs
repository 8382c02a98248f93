//! Bounty Scorer - cancellable scoring jobs for bounty submissions
//!
//! Scores a submitted artifact (text, link or uploaded file) with an inline
//! heuristic, or benchmarks a submitted Hugging Face model through an
//! external toolchain, as a single cancellable, observable job.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, error taxonomy and ports
//! - **Adapter Layer** (`adapters`): Process runner, hub fetcher, progress sinks
//! - **Service Layer** (`services`): Task lifecycle and scoring strategies
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bounty_scorer::domain::models::{ScoringConfig, Submission};
//! use bounty_scorer::domain::ports::NullSink;
//! use bounty_scorer::services::{BountyTask, HeuristicStrategy};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let strategy = Arc::new(HeuristicStrategy::new(&ScoringConfig::default()));
//!     let task = BountyTask::new(strategy, Arc::new(NullSink));
//!     let score = task.score(&Submission::text("my findings")).await?;
//!     println!("{score}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ScoreError, ScoreResult};
pub use domain::models::{
    BenchmarkConfig, Config, FileMeta, GpuConfig, LoggingConfig, ModelRef, Score, ScoringConfig,
    Submission, SubmissionKind, TaskState,
};
pub use domain::ports::{
    CommandSpec, JobContext, ModelFetcher, ProcessRunner, ProgressSink, ScoringStrategy, Severity,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{BenchmarkStrategy, BountyTask, HeuristicStrategy};
