//! External benchmark pipeline strategy.
//!
//! Resolves a Hugging Face model URL out of the submission, fetches the
//! model snapshot, installs its handler into the benchmark toolchain and
//! runs the toolchain's generate and evaluate steps, then reads the overall
//! accuracy out of the results table.
//!
//! The install target and results table are fixed paths inside the
//! toolchain tree, so everything that touches them runs under a
//! process-wide lock keyed by the toolchain root. Cancellation is checked
//! at every step boundary; an already-spawned toolchain process is not
//! signalled, the task just stops reporting once cancellation is observed.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, OnceLock, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

use crate::adapters::results::extract_overall_accuracy;
use crate::domain::errors::{ScoreError, ScoreResult};
use crate::domain::models::{BenchmarkConfig, ModelRef, Score, Submission, SubmissionKind};
use crate::domain::ports::{
    CommandSpec, JobContext, ModelFetcher, ProcessRunner, ScoringStrategy, Severity,
};

type LockMap = StdMutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>;

/// One lock per toolchain root, shared across all strategy instances.
fn install_lock(root: &Path) -> Arc<AsyncMutex<()>> {
    static LOCKS: OnceLock<LockMap> = OnceLock::new();
    let mut map = LOCKS
        .get_or_init(|| StdMutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    map.entry(root.to_path_buf())
        .or_insert_with(|| Arc::new(AsyncMutex::new(())))
        .clone()
}

/// Scores a submitted model by running it through the benchmark toolchain.
pub struct BenchmarkStrategy {
    config: BenchmarkConfig,
    runner: Arc<dyn ProcessRunner>,
    fetcher: Arc<dyn ModelFetcher>,
}

impl BenchmarkStrategy {
    /// Builds the strategy with its process and fetch collaborators.
    pub fn new(
        config: BenchmarkConfig,
        runner: Arc<dyn ProcessRunner>,
        fetcher: Arc<dyn ModelFetcher>,
    ) -> Self {
        Self {
            config,
            runner,
            fetcher,
        }
    }

    fn model_url<'a>(submission: &'a Submission) -> ScoreResult<&'a str> {
        match submission.kind {
            SubmissionKind::Text | SubmissionKind::Link => {
                submission.content.as_deref().ok_or_else(|| {
                    ScoreError::Configuration(
                        "benchmark scoring needs a model URL in the submission content".to_string(),
                    )
                })
            }
            SubmissionKind::File => Err(ScoreError::Configuration(
                "benchmark scoring accepts text or link submissions, not files".to_string(),
            )),
        }
    }

    /// Locates the handler inside the snapshot: the configured top-level
    /// name if present, otherwise the first match of a recursive search.
    async fn locate_handler(&self, snapshot: &Path) -> ScoreResult<PathBuf> {
        let preferred = snapshot.join(&self.config.handler_filename);
        if tokio::fs::try_exists(&preferred)
            .await
            .map_err(|e| ScoreError::from_io(&preferred, e))?
        {
            return Ok(preferred);
        }

        let mut pending = vec![snapshot.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| ScoreError::from_io(&dir, e))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| ScoreError::from_io(&dir, e))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| ScoreError::from_io(&path, e))?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if entry.file_name().to_string_lossy() == self.config.handler_filename {
                    return Ok(path);
                }
            }
        }
        Err(ScoreError::NotFound { path: preferred })
    }

    /// Copies the handler into the toolchain, taking a one-time `.bak` of
    /// whatever was installed before the first run.
    async fn install_handler(&self, handler: &Path, root: &Path) -> ScoreResult<PathBuf> {
        let target = root.join(&self.config.install_path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ScoreError::from_io(parent, e))?;
        }

        let backup = backup_path(&target);
        let target_exists = tokio::fs::try_exists(&target)
            .await
            .map_err(|e| ScoreError::from_io(&target, e))?;
        let backup_exists = tokio::fs::try_exists(&backup)
            .await
            .map_err(|e| ScoreError::from_io(&backup, e))?;
        if target_exists && !backup_exists {
            tokio::fs::copy(&target, &backup)
                .await
                .map_err(|e| ScoreError::from_io(&backup, e))?;
        }

        tokio::fs::copy(handler, &target)
            .await
            .map_err(|e| ScoreError::from_io(&target, e))?;
        Ok(target)
    }

    /// Removes a stale results table so a later read cannot see an old run.
    async fn discard_stale_results(&self, results: &Path) -> ScoreResult<()> {
        match tokio::fs::remove_file(results).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ScoreError::from_io(results, e)),
        }
    }

    fn toolchain_command(&self, root: &Path, subcommand: &str, model: &ModelRef) -> CommandSpec {
        let command = &self.config.command;
        let program = if command.contains(std::path::MAIN_SEPARATOR) {
            root.join(command).to_string_lossy().into_owned()
        } else {
            command.clone()
        };
        let gpu = &self.config.gpu;
        CommandSpec::new(program, root)
            .arg(subcommand)
            .arg("--model")
            .arg(model.id())
            .arg("--category")
            .arg(self.config.category.as_str())
            .arg("--backend")
            .arg(self.config.backend.as_str())
            .arg("--num-gpus")
            .arg(gpu.count.to_string())
            .arg("--gpu-memory-fraction")
            .arg(gpu.memory_fraction.to_string())
            .env("CUDA_VISIBLE_DEVICES", gpu.visible_devices.as_str())
    }

    async fn step(&self, job: &JobContext, message: &str) -> ScoreResult<()> {
        job.ensure_active()?;
        job.debug(message).await;
        Ok(())
    }
}

fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

#[async_trait]
impl ScoringStrategy for BenchmarkStrategy {
    fn name(&self) -> &'static str {
        "benchmark"
    }

    async fn score(&self, submission: &Submission, job: &JobContext) -> ScoreResult<Score> {
        job.ensure_active()?;
        let model = ModelRef::parse(Self::model_url(submission)?)?;
        job.emit(
            Severity::Info,
            "benchmarking model",
            HashMap::from([("model".to_string(), json!(model.id()))]),
        )
        .await;

        self.step(job, "fetching model snapshot").await?;
        let snapshot = self
            .fetcher
            .fetch(&model, &job.cancel)
            .await?;

        self.step(job, "locating handler").await?;
        let handler = self.locate_handler(&snapshot).await?;

        let root = PathBuf::from(&self.config.toolchain_root);
        if !tokio::fs::try_exists(&root)
            .await
            .map_err(|e| ScoreError::from_io(&root, e))?
        {
            return Err(ScoreError::Configuration(format!(
                "benchmark toolchain not found at {}",
                root.display()
            )));
        }

        // Everything below touches fixed paths inside the toolchain tree.
        let lock = install_lock(&root);
        let _guard = lock.lock().await;

        self.step(job, "installing handler").await?;
        self.install_handler(&handler, &root).await?;

        let results = root.join(&self.config.results_path);
        self.step(job, "discarding stale results").await?;
        self.discard_stale_results(&results).await?;

        self.step(job, "running generate").await?;
        let generate = self
            .toolchain_command(&root, "generate", &model)
            .arg("--model-path")
            .arg(snapshot.to_string_lossy().into_owned());
        self.runner.run(&generate).await?;

        self.step(job, "running evaluate").await?;
        let evaluate = self.toolchain_command(&root, "evaluate", &model);
        self.runner.run(&evaluate).await?;

        self.step(job, "reading results").await?;
        let accuracy = extract_overall_accuracy(&results).await?;
        let score = Score::from_raw(accuracy);

        job.emit(
            Severity::Info,
            "benchmark score extracted",
            HashMap::from([
                ("model".to_string(), json!(model.id())),
                ("score".to_string(), json!(score.value())),
            ]),
        )
        .await;
        Ok(score)
    }
}
