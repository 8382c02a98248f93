//! Command-line interface for scoring bounty submissions.

use anyhow::{Context, Result};
use base64::Engine;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::{HubFetcher, TokioProcessRunner, TracingSink};
use crate::domain::errors::ScoreError;
use crate::domain::models::{Config, FileMeta, Submission};
use crate::domain::ports::ScoringStrategy;
use crate::infrastructure::{config::ConfigLoader, logging};
use crate::services::{BenchmarkStrategy, BountyTask, HeuristicStrategy};

/// Score bounty submissions from the command line.
#[derive(Parser, Debug)]
#[command(name = "bounty-scorer", version, about = "Scores bounty submissions")]
pub struct Cli {
    /// Output the result as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a configuration file (defaults to bounty.yaml plus BOUNTY_* env)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a plain-text submission
    Text {
        /// The submission text
        content: String,
    },
    /// Score a link submission
    Link {
        /// The submitted URL
        url: String,
    },
    /// Score an uploaded file
    File {
        /// Path to the file to score
        path: PathBuf,
        /// Declared MIME type (e.g. application/pdf)
        #[arg(long)]
        mime: Option<String>,
    },
    /// Benchmark a submitted Hugging Face model
    Model {
        /// The model URL, e.g. https://huggingface.co/org/name
        url: String,
    },
}

/// Runs the selected command to completion. Ctrl-C cancels the job.
pub async fn execute(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logging_guard = logging::init(&config.logging)?;

    let submission = build_submission(&cli.command).await?;
    let strategy = build_strategy(&cli.command, &config);

    let task = Arc::new(BountyTask::new(strategy, Arc::new(TracingSink)));
    let canceller = task.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    match task.score(&submission).await {
        Ok(score) => {
            if cli.json {
                println!(
                    "{}",
                    json!({ "job_id": task.job_id(), "score": score.value() })
                );
            } else {
                println!("Score: {score}");
            }
            Ok(())
        }
        Err(ScoreError::Cancelled) => {
            if cli.json {
                println!("{}", json!({ "job_id": task.job_id(), "cancelled": true }));
            } else {
                eprintln!("Scoring cancelled");
            }
            Err(ScoreError::Cancelled.into())
        }
        Err(err) => Err(err.into()),
    }
}

async fn build_submission(command: &Commands) -> Result<Submission> {
    match command {
        Commands::Text { content } => Ok(Submission::text(content)),
        Commands::Link { url } | Commands::Model { url } => Ok(Submission::link(url)),
        Commands::File { path, mime } => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let filename = path
                .file_name()
                .map_or_else(|| "unknown".to_string(), |n| n.to_string_lossy().into_owned());
            let mut submission = Submission::file(
                base64::engine::general_purpose::STANDARD.encode(bytes),
                mime.as_ref().map(|mime_type| FileMeta {
                    filename: filename.clone(),
                    mime_type: mime_type.clone(),
                }),
            );
            submission.file_name = Some(filename);
            Ok(submission)
        }
    }
}

fn build_strategy(command: &Commands, config: &Config) -> Arc<dyn ScoringStrategy> {
    match command {
        Commands::Model { .. } => Arc::new(BenchmarkStrategy::new(
            config.benchmark.clone(),
            Arc::new(TokioProcessRunner),
            Arc::new(HubFetcher::new(
                config.benchmark.hub_endpoint.clone(),
                config.benchmark.models_dir.clone(),
            )),
        )),
        Commands::Text { .. } | Commands::Link { .. } | Commands::File { .. } => {
            Arc::new(HeuristicStrategy::new(&config.scoring))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_command() {
        let cli = Cli::try_parse_from(["bounty-scorer", "text", "my findings"]).unwrap();
        assert!(matches!(cli.command, Commands::Text { ref content } if content == "my findings"));
        assert!(!cli.json);
    }

    #[test]
    fn parses_model_command_with_json_flag() {
        let cli = Cli::try_parse_from([
            "bounty-scorer",
            "model",
            "https://huggingface.co/org/name",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Model { .. }));
    }

    #[test]
    fn file_command_takes_optional_mime() {
        let cli = Cli::try_parse_from([
            "bounty-scorer",
            "file",
            "report.pdf",
            "--mime",
            "application/pdf",
        ])
        .unwrap();
        match cli.command {
            Commands::File { path, mime } => {
                assert_eq!(path, PathBuf::from("report.pdf"));
                assert_eq!(mime.as_deref(), Some("application/pdf"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["bounty-scorer"]).is_err());
    }

    #[tokio::test]
    async fn file_submission_encodes_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();

        let submission = build_submission(&Commands::File {
            path,
            mime: Some("text/plain".to_string()),
        })
        .await
        .unwrap();
        assert_eq!(submission.file_data.as_deref(), Some("aGVsbG8="));
        assert_eq!(submission.display_name(), "notes.txt");
        assert_eq!(
            submission.file_info.as_ref().map(|i| i.mime_type.as_str()),
            Some("text/plain")
        );
    }
}
