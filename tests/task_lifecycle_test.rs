//! Integration tests for the task lifecycle: single-use scoring,
//! cancellation in every phase, and cleanup semantics.

use std::sync::Arc;
use std::time::Duration;

use bounty_scorer::adapters::MemorySink;
use bounty_scorer::domain::models::{ScoringConfig, Submission, TaskState};
use bounty_scorer::services::{BountyTask, HeuristicStrategy};
use bounty_scorer::ScoreError;

fn fast_task(sink: Arc<MemorySink>) -> BountyTask {
    let strategy = Arc::new(HeuristicStrategy::new(&ScoringConfig {
        processing_delay_ms: 0,
    }));
    BountyTask::new(strategy, sink)
}

fn slow_task(sink: Arc<MemorySink>) -> BountyTask {
    let strategy = Arc::new(HeuristicStrategy::new(&ScoringConfig {
        processing_delay_ms: 60_000,
    }));
    BountyTask::new(strategy, sink)
}

#[tokio::test]
async fn scoring_twice_is_a_usage_error() {
    let task = fast_task(Arc::new(MemorySink::new()));
    let first = task.score(&Submission::text("findings")).await;
    assert!(first.is_ok());

    let second = task.score(&Submission::text("findings")).await;
    match second {
        Err(ScoreError::Usage(message)) => assert!(message.contains("already called")),
        other => panic!("expected usage error, got {other:?}"),
    }
    assert_eq!(task.state(), TaskState::Completed);
}

#[tokio::test]
async fn cancel_before_score_fails_fast() {
    let sink = Arc::new(MemorySink::new());
    let task = slow_task(sink.clone());
    task.cancel();
    assert_eq!(task.state(), TaskState::Cancelled);

    // Even a 60s strategy returns immediately: no work is started.
    let result = tokio::time::timeout(
        Duration::from_secs(1),
        task.score(&Submission::text("findings")),
    )
    .await
    .expect("pre-emptively cancelled score must not do work");
    assert!(matches!(result, Err(ScoreError::Cancelled)));
    assert!(sink.saw("cancelled before start"));
}

#[tokio::test]
async fn cancel_during_processing_delay_resolves_to_cancelled() {
    let sink = Arc::new(MemorySink::new());
    let task = Arc::new(slow_task(sink.clone()));

    let runner = {
        let task = task.clone();
        tokio::spawn(async move { task.score(&Submission::text("findings")).await })
    };
    // Let the strategy reach its delay before cancelling.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(task.state(), TaskState::Running);

    task.cancel();
    let result = tokio::time::timeout(Duration::from_secs(5), runner)
        .await
        .expect("cancellation must interrupt the delay")
        .expect("scoring future must not panic");

    assert!(matches!(result, Err(ScoreError::Cancelled)));
    assert_eq!(task.state(), TaskState::Cancelled);
}

#[tokio::test]
async fn cancel_after_completion_is_a_noop() {
    let task = fast_task(Arc::new(MemorySink::new()));
    let score = task.score(&Submission::link("https://example.com")).await.unwrap();
    assert_eq!(score.value(), 85.0);

    task.cancel();
    task.cancel();
    assert_eq!(task.state(), TaskState::Completed);
}

#[tokio::test]
async fn cancel_is_idempotent_while_running() {
    let task = Arc::new(slow_task(Arc::new(MemorySink::new())));
    let runner = {
        let task = task.clone();
        tokio::spawn(async move { task.score(&Submission::text("findings")).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    task.cancel();
    task.cancel();
    task.cancel();

    let result = runner.await.unwrap();
    assert!(matches!(result, Err(ScoreError::Cancelled)));
    assert_eq!(task.state(), TaskState::Cancelled);
}

#[tokio::test]
async fn cleanup_makes_the_task_unusable() {
    let task = fast_task(Arc::new(MemorySink::new()));
    task.cleanup();
    task.cleanup();

    let result = task.score(&Submission::text("findings")).await;
    assert!(matches!(result, Err(ScoreError::Usage(_))));
}

#[tokio::test]
async fn progress_events_carry_the_job_id() {
    let sink = Arc::new(MemorySink::new());
    let task = fast_task(sink.clone());
    task.score(&Submission::text("findings")).await.unwrap();

    let events = sink.events();
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e.job_id == task.job_id()));
    assert!(sink.saw("scoring started"));
    assert!(sink.saw("scoring completed"));
}
