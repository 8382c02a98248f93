//! Inline heuristic scoring strategy.
//!
//! Pure arithmetic over the submission's in-memory content, preceded by a
//! configurable processing delay. The delay is the strategy's only
//! suspension point and is fully cancellable.

use async_trait::async_trait;
use base64::Engine;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::errors::{ScoreError, ScoreResult};
use crate::domain::models::{Score, ScoringConfig, Submission, SubmissionKind};
use crate::domain::ports::{JobContext, ScoringStrategy, Severity};

/// Scores submissions with fixed formulas over their content.
#[derive(Debug, Clone)]
pub struct HeuristicStrategy {
    delay: Duration,
}

impl HeuristicStrategy {
    /// Builds the strategy from the scoring tunables.
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.processing_delay_ms),
        }
    }

    fn score_text(content: Option<&str>) -> f64 {
        let len = content.map_or(0, str::len);
        (len as f64 / 1000.0).min(1.0) * 100.0
    }

    fn score_link(content: Option<&str>) -> f64 {
        // Absent content is poor format (30), not the zero Text gives it.
        match content {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => 85.0,
            _ => 30.0,
        }
    }

    async fn score_file(submission: &Submission, job: &JobContext) -> f64 {
        let bytes = match submission.file_data.as_deref() {
            Some(data) => match base64::engine::general_purpose::STANDARD.decode(data) {
                Ok(bytes) => bytes,
                Err(e) => {
                    // A bad encoding is the submitter's problem, not ours.
                    job.emit(
                        Severity::Warning,
                        "file data could not be decoded, treating as empty",
                        HashMap::from([
                            ("file".to_string(), json!(submission.display_name())),
                            ("reason".to_string(), json!(e.to_string())),
                        ]),
                    )
                    .await;
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if bytes.is_empty() {
            return 0.0;
        }

        let size_kb = bytes.len() as f64 / 1024.0;
        let size_component = (size_kb / 100.0).min(1.0) * 50.0;

        let mime_component = match submission.file_info.as_ref() {
            Some(info) => {
                let mime = info.mime_type.as_str();
                if mime.contains("text") || mime == "application/json" {
                    30.0
                } else if mime.contains("image") {
                    25.0
                } else if mime == "application/pdf" {
                    35.0
                } else {
                    20.0
                }
            }
            None => 0.0,
        };

        size_component + mime_component
    }
}

#[async_trait]
impl ScoringStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn score(&self, submission: &Submission, job: &JobContext) -> ScoreResult<Score> {
        job.emit(
            Severity::Info,
            "processing submission",
            HashMap::from([("kind".to_string(), json!(submission.kind.as_str()))]),
        )
        .await;

        // Simulated processing latency. Cancellation here aborts before any
        // arithmetic runs and is logged distinctly from one arriving later.
        tokio::select! {
            () = job.cancel.cancelled() => {
                job.warn("cancelled during processing delay").await;
                return Err(ScoreError::Cancelled);
            }
            () = tokio::time::sleep(self.delay) => {}
        }

        let raw = match submission.kind {
            SubmissionKind::Text => Self::score_text(submission.content.as_deref()),
            SubmissionKind::Link => Self::score_link(submission.content.as_deref()),
            SubmissionKind::File => Self::score_file(submission, job).await,
        };
        let score = Score::from_raw(raw);

        if job.cancel.is_cancelled() {
            job.warn("cancelled after scoring, discarding result").await;
            return Err(ScoreError::Cancelled);
        }

        job.emit(
            Severity::Info,
            "heuristic score computed",
            HashMap::from([("score".to_string(), json!(score.value()))]),
        )
        .await;
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemorySink;
    use crate::domain::models::FileMeta;
    use crate::domain::ports::NullSink;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    fn fast() -> HeuristicStrategy {
        HeuristicStrategy::new(&ScoringConfig {
            processing_delay_ms: 0,
        })
    }

    fn ctx() -> JobContext {
        JobContext::new("job-1", Arc::new(NullSink), CancellationToken::new())
    }

    async fn score_of(submission: &Submission) -> f64 {
        fast()
            .score(submission, &ctx())
            .await
            .expect("scoring succeeds")
            .value()
    }

    #[tokio::test]
    async fn text_scales_with_length() {
        assert_eq!(score_of(&Submission::text("a".repeat(500))).await, 50.0);
        assert_eq!(score_of(&Submission::text("a".repeat(1000))).await, 100.0);
        assert_eq!(score_of(&Submission::text("a".repeat(5000))).await, 100.0);
        assert_eq!(score_of(&Submission::text("")).await, 0.0);
    }

    #[tokio::test]
    async fn link_prefix_is_case_sensitive() {
        assert_eq!(score_of(&Submission::link("https://example.com")).await, 85.0);
        assert_eq!(score_of(&Submission::link("http://example.com")).await, 85.0);
        assert_eq!(score_of(&Submission::link("ftp://x")).await, 30.0);
        assert_eq!(score_of(&Submission::link("HTTPS://example.com")).await, 30.0);
    }

    #[tokio::test]
    async fn empty_file_scores_zero_despite_mime() {
        let sub = Submission::file(
            "",
            Some(FileMeta {
                filename: "empty.pdf".into(),
                mime_type: "application/pdf".into(),
            }),
        );
        assert_eq!(score_of(&sub).await, 0.0);
    }

    #[tokio::test]
    async fn file_score_combines_size_and_mime() {
        // 2048 bytes = 2 KB: size component 2/100 * 50 = 1.0, pdf adds 35.
        let data = base64::engine::general_purpose::STANDARD.encode(vec![0u8; 2048]);
        let sub = Submission::file(
            data.clone(),
            Some(FileMeta {
                filename: "report.pdf".into(),
                mime_type: "application/pdf".into(),
            }),
        );
        assert_eq!(score_of(&sub).await, 36.0);

        // Same bytes, no metadata: size component only.
        assert_eq!(score_of(&Submission::file(data, None)).await, 1.0);
    }

    #[tokio::test]
    async fn undecodable_file_is_logged_and_scores_zero() {
        let sink = MemorySink::new();
        let job = JobContext::new("job-1", Arc::new(sink.clone()), CancellationToken::new());
        let sub = Submission::file("!!not base64!!", None);
        let score = fast().score(&sub, &job).await.unwrap();
        assert_eq!(score.value(), 0.0);
        assert!(sink.saw("could not be decoded"));
    }

    #[tokio::test]
    async fn cancellation_during_delay_skips_arithmetic() {
        let strategy = HeuristicStrategy::new(&ScoringConfig {
            processing_delay_ms: 60_000,
        });
        let sink = MemorySink::new();
        let job = JobContext::new("job-1", Arc::new(sink.clone()), CancellationToken::new());
        job.cancel.cancel();

        let err = strategy
            .score(&Submission::text("hello"), &job)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(sink.saw("cancelled during processing delay"));
    }
}
