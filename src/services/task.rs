//! Bounty scoring task lifecycle.
//!
//! A `BountyTask` owns exactly one scoring strategy invocation and the
//! state machine around it. `score()` runs at most once; `cancel()` and
//! `cleanup()` are synchronous, idempotent and callable from any thread.

use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::errors::{ScoreError, ScoreResult};
use crate::domain::models::{Score, Submission, TaskState};
use crate::domain::ports::{JobContext, ProgressSink, ScoringStrategy, Severity};

/// One cancellable scoring job for a single submission.
pub struct BountyTask {
    job_id: String,
    strategy: Arc<dyn ScoringStrategy>,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
    started: AtomicBool,
    state: Mutex<TaskState>,
}

impl BountyTask {
    /// Creates a task with a fresh job identifier.
    pub fn new(strategy: Arc<dyn ScoringStrategy>, sink: Arc<dyn ProgressSink>) -> Self {
        Self::with_job_id(Uuid::new_v4().to_string(), strategy, sink)
    }

    /// Creates a task with a caller-chosen job identifier.
    pub fn with_job_id(
        job_id: impl Into<String>,
        strategy: Arc<dyn ScoringStrategy>,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            strategy,
            sink,
            cancel: CancellationToken::new(),
            started: AtomicBool::new(false),
            state: Mutex::new(TaskState::Idle),
        }
    }

    /// The job identifier attached to every progress event.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Scores the submission. At most one call per task: a second call is a
    /// usage error, distinct from any scoring failure.
    ///
    /// A cancellation requested before or during execution resolves the
    /// task to `Cancelled` and returns [`ScoreError::Cancelled`], even if
    /// the strategy happened to produce a value.
    pub async fn score(&self, submission: &Submission) -> ScoreResult<Score> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ScoreError::Usage(format!(
                "score() already called on job {}",
                self.job_id
            )));
        }

        // Pre-emptive cancellation: fail fast without doing any work.
        if self.cancel.is_cancelled() {
            self.set_state(TaskState::Cancelled);
            self.emit(
                Severity::Warning,
                "scoring skipped, cancelled before start",
                HashMap::new(),
            )
            .await;
            return Err(ScoreError::Cancelled);
        }

        self.set_state(TaskState::Running);
        self.emit(
            Severity::Info,
            "scoring started",
            HashMap::from([
                ("kind".to_string(), json!(submission.kind.as_str())),
                ("strategy".to_string(), json!(self.strategy.name())),
            ]),
        )
        .await;

        let job = JobContext::new(self.job_id.clone(), self.sink.clone(), self.cancel.clone());
        let result = tokio::select! {
            () = self.cancel.cancelled() => Err(ScoreError::Cancelled),
            res = self.strategy.score(submission, &job) => res,
        };

        // The strategy's value is void once cancellation was requested.
        if self.cancel.is_cancelled() || matches!(result, Err(ScoreError::Cancelled)) {
            self.resolve_cancelled();
            self.emit(Severity::Warning, "scoring cancelled", HashMap::new())
                .await;
            return Err(ScoreError::Cancelled);
        }

        match result {
            Ok(score) => {
                self.set_state(TaskState::Completed);
                self.emit(
                    Severity::Info,
                    "scoring completed",
                    HashMap::from([("score".to_string(), json!(score.value()))]),
                )
                .await;
                Ok(score)
            }
            Err(err) => {
                self.set_state(TaskState::Failed);
                self.emit(
                    Severity::Error,
                    "scoring failed",
                    HashMap::from([("error".to_string(), json!(err.to_string()))]),
                )
                .await;
                Err(err)
            }
        }
    }

    /// Requests cancellation. Idempotent, never blocks, safe before, during
    /// and after `score()` (a no-op once the task is terminal).
    ///
    /// Logs through `tracing` directly: this path is synchronous and the
    /// async sink cannot be awaited here.
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            TaskState::Idle => {
                *state = TaskState::Cancelled;
                tracing::info!(job_id = %self.job_id, "cancelled before any work started");
            }
            TaskState::Running => {
                *state = TaskState::Cancelling;
                tracing::info!(job_id = %self.job_id, "cancellation requested, interrupting live operation");
            }
            TaskState::Cancelling => {
                tracing::debug!(job_id = %self.job_id, "cancellation already in progress");
            }
            TaskState::Completed | TaskState::Failed | TaskState::Cancelled => {
                tracing::debug!(
                    job_id = %self.job_id,
                    state = state.as_str(),
                    "cancel is a no-op, no live operation"
                );
            }
        }
        drop(state);
        self.cancel.cancel();
    }

    /// Releases the task's resources. Always safe, always terminal: marks
    /// the task non-restartable, cancels any live work and never panics
    /// past this boundary.
    pub fn cleanup(&self) {
        self.started.store(true, Ordering::SeqCst);
        self.cancel();
        tracing::debug!(job_id = %self.job_id, state = self.state().as_str(), "cleanup complete");
    }

    async fn emit(
        &self,
        severity: Severity,
        message: &str,
        fields: HashMap<String, serde_json::Value>,
    ) {
        self.sink.emit(severity, message, &self.job_id, fields).await;
    }

    fn set_state(&self, next: TaskState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.can_transition_to(next) {
            *state = next;
        } else {
            tracing::warn!(
                job_id = %self.job_id,
                from = state.as_str(),
                to = next.as_str(),
                "ignoring invalid state transition"
            );
        }
    }

    /// Resolves a cancelled run to `Cancelled`, routing through
    /// `Cancelling` when the cancel request raced with completion.
    fn resolve_cancelled(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == TaskState::Running {
            *state = TaskState::Cancelling;
        }
        if *state == TaskState::Cancelling {
            *state = TaskState::Cancelled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemorySink;
    use crate::domain::ports::NullSink;
    use async_trait::async_trait;

    struct FixedStrategy(f64);

    #[async_trait]
    impl ScoringStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn score(&self, _submission: &Submission, _job: &JobContext) -> ScoreResult<Score> {
            Ok(Score::from_raw(self.0))
        }
    }

    struct HangingStrategy;

    #[async_trait]
    impl ScoringStrategy for HangingStrategy {
        fn name(&self) -> &'static str {
            "hanging"
        }

        async fn score(&self, _submission: &Submission, job: &JobContext) -> ScoreResult<Score> {
            job.cancel.cancelled().await;
            Err(ScoreError::Cancelled)
        }
    }

    fn task(strategy: Arc<dyn ScoringStrategy>) -> BountyTask {
        BountyTask::with_job_id("job-test", strategy, Arc::new(NullSink))
    }

    #[tokio::test]
    async fn completes_and_reports_state() {
        let task = task(Arc::new(FixedStrategy(42.0)));
        assert_eq!(task.state(), TaskState::Idle);
        let score = task.score(&Submission::text("hi")).await.unwrap();
        assert_eq!(score.value(), 42.0);
        assert_eq!(task.state(), TaskState::Completed);
    }

    #[tokio::test]
    async fn second_score_is_a_usage_error() {
        let task = task(Arc::new(FixedStrategy(10.0)));
        task.score(&Submission::text("hi")).await.unwrap();
        let err = task.score(&Submission::text("hi")).await.unwrap_err();
        assert!(matches!(err, ScoreError::Usage(_)));
        // The completed state is untouched by the rejected call.
        assert_eq!(task.state(), TaskState::Completed);
    }

    #[tokio::test]
    async fn preemptive_cancel_fails_fast() {
        let sink = MemorySink::new();
        let task = BountyTask::with_job_id(
            "job-test",
            Arc::new(FixedStrategy(99.0)),
            Arc::new(sink.clone()),
        );
        task.cancel();
        assert_eq!(task.state(), TaskState::Cancelled);

        let err = task.score(&Submission::text("hi")).await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(sink.saw("cancelled before start"));
    }

    #[tokio::test]
    async fn cancel_during_run_resolves_to_cancelled() {
        let task = Arc::new(task(Arc::new(HangingStrategy)));
        let runner = {
            let task = task.clone();
            tokio::spawn(async move { task.score(&Submission::text("hi")).await })
        };
        tokio::task::yield_now().await;
        task.cancel();

        let err = runner.await.unwrap().unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(task.state(), TaskState::Cancelled);
    }

    #[tokio::test]
    async fn cancel_after_completion_is_a_noop() {
        let task = task(Arc::new(FixedStrategy(5.0)));
        task.score(&Submission::text("hi")).await.unwrap();
        task.cancel();
        task.cancel();
        assert_eq!(task.state(), TaskState::Completed);
    }

    #[tokio::test]
    async fn cleanup_is_terminal_and_idempotent() {
        let task = task(Arc::new(FixedStrategy(5.0)));
        task.cleanup();
        task.cleanup();
        let err = task.score(&Submission::text("hi")).await.unwrap_err();
        assert!(matches!(err, ScoreError::Usage(_)));
    }
}
