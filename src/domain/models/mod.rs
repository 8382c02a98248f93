//! Domain models: submissions, scores, task state, configuration.

pub mod config;
pub mod model_ref;
pub mod score;
pub mod submission;
pub mod task;

pub use config::{BenchmarkConfig, Config, GpuConfig, LoggingConfig, ScoringConfig};
pub use model_ref::ModelRef;
pub use score::{round2, Score};
pub use submission::{FileMeta, Submission, SubmissionKind};
pub use task::TaskState;
