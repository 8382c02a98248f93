//! End-to-end heuristic scoring scenarios through the task API.

use proptest::prelude::*;
use std::sync::Arc;

use bounty_scorer::domain::models::{FileMeta, ScoringConfig, Submission};
use bounty_scorer::domain::ports::NullSink;
use bounty_scorer::services::{BountyTask, HeuristicStrategy};

fn task() -> BountyTask {
    let strategy = Arc::new(HeuristicStrategy::new(&ScoringConfig {
        processing_delay_ms: 0,
    }));
    BountyTask::new(strategy, Arc::new(NullSink))
}

async fn score(submission: Submission) -> f64 {
    task().score(&submission).await.expect("scoring succeeds").value()
}

#[tokio::test]
async fn text_of_500_chars_scores_50() {
    assert_eq!(score(Submission::text("x".repeat(500))).await, 50.0);
}

#[tokio::test]
async fn text_score_saturates_at_100() {
    assert_eq!(score(Submission::text("x".repeat(1000))).await, 100.0);
    assert_eq!(score(Submission::text("x".repeat(20_000))).await, 100.0);
}

#[tokio::test]
async fn empty_text_scores_zero() {
    assert_eq!(score(Submission::text("")).await, 0.0);
}

#[tokio::test]
async fn http_links_score_85() {
    assert_eq!(score(Submission::link("https://example.com/report")).await, 85.0);
    assert_eq!(score(Submission::link("http://example.com/report")).await, 85.0);
}

#[tokio::test]
async fn non_http_links_score_30() {
    assert_eq!(score(Submission::link("ftp://x")).await, 30.0);
    assert_eq!(score(Submission::link("example.com")).await, 30.0);
}

#[tokio::test]
async fn zero_byte_file_scores_zero() {
    let submission = Submission::file(
        "",
        Some(FileMeta {
            filename: "empty.bin".into(),
            mime_type: "application/octet-stream".into(),
        }),
    );
    assert_eq!(score(submission).await, 0.0);
}

#[tokio::test]
async fn pdf_file_gets_size_and_mime_components() {
    use base64::Engine;
    // 100 KB saturates the size component at 50; pdf adds 35.
    let data = base64::engine::general_purpose::STANDARD.encode(vec![7u8; 100 * 1024]);
    let submission = Submission::file(
        data,
        Some(FileMeta {
            filename: "writeup.pdf".into(),
            mime_type: "application/pdf".into(),
        }),
    );
    assert_eq!(score(submission).await, 85.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn longer_text_never_scores_lower(short in 0usize..2000, extra in 0usize..2000) {
        let (a, b) = tokio_test::block_on(async {
            (
                score(Submission::text("x".repeat(short))).await,
                score(Submission::text("x".repeat(short + extra))).await,
            )
        });
        prop_assert!(b >= a, "score({}) = {a} > score({}) = {b}", short, short + extra);
    }
}
