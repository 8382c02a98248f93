//! Hugging Face hub model fetcher.
//!
//! Lists a model repository's files through the hub API and downloads each
//! into a deterministic local snapshot directory keyed by the model
//! identifier. Files already present locally are skipped, so an
//! interrupted fetch resumes where it left off.

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::{ScoreError, ScoreResult};
use crate::domain::models::ModelRef;
use crate::domain::ports::ModelFetcher;

#[derive(Debug, Deserialize)]
struct RepoInfo {
    #[serde(default)]
    siblings: Vec<Sibling>,
}

#[derive(Debug, Deserialize)]
struct Sibling {
    rfilename: String,
}

/// [`ModelFetcher`] backed by the hub's HTTP API.
#[derive(Debug, Clone)]
pub struct HubFetcher {
    client: reqwest::Client,
    endpoint: String,
    models_dir: PathBuf,
}

impl HubFetcher {
    /// Creates a fetcher against `endpoint`, storing snapshots under
    /// `models_dir`.
    pub fn new(endpoint: impl Into<String>, models_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            models_dir: models_dir.into(),
        }
    }

    async fn list_files(&self, model: &ModelRef) -> ScoreResult<Vec<String>> {
        let url = format!("{}/api/models/{}", self.endpoint, model.id());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(model, format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(fetch_error(
                model,
                format!("hub returned {} for {url}", response.status()),
            ));
        }

        let info: RepoInfo = response
            .json()
            .await
            .map_err(|e| fetch_error(model, format!("invalid repository listing: {e}")))?;
        Ok(info.siblings.into_iter().map(|s| s.rfilename).collect())
    }

    async fn download_file(&self, model: &ModelRef, name: &str, dest: &Path) -> ScoreResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ScoreError::from_io(parent, e))?;
        }

        let url = format!("{}/{}/resolve/main/{}", self.endpoint, model.id(), name);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(model, format!("download of {name} failed: {e}")))?;
        if !response.status().is_success() {
            return Err(fetch_error(
                model,
                format!("hub returned {} for {name}", response.status()),
            ));
        }

        // Stream into a partial file, rename only once complete, so a
        // half-written download is never mistaken for a finished one.
        let mut partial_name = dest.as_os_str().to_os_string();
        partial_name.push(".part");
        let partial = PathBuf::from(partial_name);
        let mut file = tokio::fs::File::create(&partial)
            .await
            .map_err(|e| ScoreError::from_io(&partial, e))?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| fetch_error(model, format!("stream of {name} failed: {e}")))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| ScoreError::from_io(&partial, e))?;
        }
        file.flush()
            .await
            .map_err(|e| ScoreError::from_io(&partial, e))?;
        drop(file);

        tokio::fs::rename(&partial, dest)
            .await
            .map_err(|e| ScoreError::from_io(dest, e))?;
        Ok(())
    }
}

#[async_trait]
impl ModelFetcher for HubFetcher {
    async fn fetch(&self, model: &ModelRef, cancel: &CancellationToken) -> ScoreResult<PathBuf> {
        let dir = model.local_dir(&self.models_dir);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ScoreError::from_io(&dir, e))?;

        let files = self.list_files(model).await?;
        tracing::debug!(model = %model, files = files.len(), "fetching model snapshot");

        for name in files {
            if cancel.is_cancelled() {
                return Err(ScoreError::Cancelled);
            }
            // Listing entries must stay inside the snapshot directory.
            if name.split('/').any(|part| part == "..") {
                return Err(fetch_error(model, format!("suspicious file path {name:?}")));
            }
            let dest = dir.join(&name);
            match tokio::fs::metadata(&dest).await {
                Ok(meta) if meta.len() > 0 => {
                    tracing::debug!(file = %name, "already present, skipping");
                    continue;
                }
                _ => {}
            }
            self.download_file(model, &name, &dest).await?;
        }

        Ok(dir)
    }
}

fn fetch_error(model: &ModelRef, reason: String) -> ScoreError {
    ScoreError::Fetch {
        model: model.id(),
        reason,
    }
}
