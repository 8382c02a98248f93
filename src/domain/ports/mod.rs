//! Port trait definitions (hexagonal architecture).
//!
//! Async trait interfaces the adapters implement:
//! - `ProgressSink` - structured progress/log event observer
//! - `ScoringStrategy` - polymorphic scoring over submission kinds
//! - `ProcessRunner` - external command execution
//! - `ModelFetcher` - model snapshot retrieval

pub mod fetcher;
pub mod process;
pub mod progress;
pub mod strategy;

pub use fetcher::ModelFetcher;
pub use process::{CommandSpec, ProcessRunner};
pub use progress::{NullSink, ProgressSink, Severity};
pub use strategy::{JobContext, ScoringStrategy};
