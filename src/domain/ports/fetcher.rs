//! Model fetcher port.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::ScoreResult;
use crate::domain::models::ModelRef;

/// Fetches a model snapshot into a deterministic local directory.
///
/// Fetching is resumable: files already present locally are not
/// re-downloaded. Implementations check `cancel` between files so a
/// long snapshot download can be abandoned cooperatively.
#[async_trait]
pub trait ModelFetcher: Send + Sync {
    /// Downloads (or completes) the snapshot and returns its local directory.
    async fn fetch(&self, model: &ModelRef, cancel: &CancellationToken) -> ScoreResult<PathBuf>;
}
