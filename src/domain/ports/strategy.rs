//! Scoring strategy port and per-job execution context.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::{ScoreError, ScoreResult};
use crate::domain::models::{Score, Submission};
use crate::domain::ports::progress::{ProgressSink, Severity};

/// Execution context a task hands to its strategy.
///
/// Bundles the job identity, the caller's progress sink and the cooperative
/// cancellation token. Strategies check the token at every suspension-point
/// boundary; the token does not reach into already-spawned processes.
#[derive(Clone)]
pub struct JobContext {
    /// Stable job identifier attached to every progress event.
    pub job_id: String,
    /// Borrowed progress sink; outlives the task.
    pub sink: Arc<dyn ProgressSink>,
    /// Cooperative cancellation token shared with the owning task.
    pub cancel: CancellationToken,
}

impl JobContext {
    /// Creates a context for a job.
    pub fn new(
        job_id: impl Into<String>,
        sink: Arc<dyn ProgressSink>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            sink,
            cancel,
        }
    }

    /// Emits a structured progress event.
    pub async fn emit(&self, severity: Severity, message: &str, fields: HashMap<String, Value>) {
        self.sink.emit(severity, message, &self.job_id, fields).await;
    }

    /// Emits a debug event without fields.
    pub async fn debug(&self, message: &str) {
        self.emit(Severity::Debug, message, HashMap::new()).await;
    }

    /// Emits an info event without fields.
    pub async fn info(&self, message: &str) {
        self.emit(Severity::Info, message, HashMap::new()).await;
    }

    /// Emits a warning event without fields.
    pub async fn warn(&self, message: &str) {
        self.emit(Severity::Warning, message, HashMap::new()).await;
    }

    /// Emits an error event without fields.
    pub async fn error(&self, message: &str) {
        self.emit(Severity::Error, message, HashMap::new()).await;
    }

    /// Fails with [`ScoreError::Cancelled`] if cancellation was requested.
    ///
    /// Called at each step boundary of a multi-step strategy.
    pub fn ensure_active(&self) -> ScoreResult<()> {
        if self.cancel.is_cancelled() {
            Err(ScoreError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Polymorphic scoring over the submission's kind.
///
/// A strategy computes or orchestrates the production of a score. The
/// owning task guarantees at most one invocation is in flight per task.
#[async_trait]
pub trait ScoringStrategy: Send + Sync {
    /// Strategy name used in logs and progress events.
    fn name(&self) -> &'static str;

    /// Scores the submission, emitting progress through `job`.
    ///
    /// Returns [`ScoreError::Cancelled`] if cancellation is observed at a
    /// suspension point; never reports a partial score after that.
    async fn score(&self, submission: &Submission, job: &JobContext) -> ScoreResult<Score>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::progress::NullSink;

    #[tokio::test]
    async fn ensure_active_reflects_token() {
        let ctx = JobContext::new("job-1", Arc::new(NullSink), CancellationToken::new());
        assert!(ctx.ensure_active().is_ok());
        ctx.cancel.cancel();
        assert!(matches!(ctx.ensure_active(), Err(ScoreError::Cancelled)));
    }
}
