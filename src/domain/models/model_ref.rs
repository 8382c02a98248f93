//! Model reference parsed from a hub URL.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::domain::errors::{ScoreError, ScoreResult};

fn model_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https?://huggingface\.co/([A-Za-z0-9][A-Za-z0-9_.-]*)/([A-Za-z0-9][A-Za-z0-9_.-]*)/?")
            .expect("static regex is valid")
    })
}

/// A `namespace/name` model identifier resolved from a submission URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    /// Hub namespace (organization or user).
    pub namespace: String,
    /// Model repository name.
    pub name: String,
}

impl ModelRef {
    /// Parses a Hugging Face model URL.
    ///
    /// Anything that is not a well-formed model URL is a configuration
    /// error, not a low score: the caller submitted the wrong thing.
    pub fn parse(url: &str) -> ScoreResult<Self> {
        let caps = model_url_re().captures(url.trim()).ok_or_else(|| {
            ScoreError::Configuration(format!(
                "expected a Hugging Face model URL like https://huggingface.co/<namespace>/<name>, got {url:?}"
            ))
        })?;
        Ok(Self {
            namespace: caps[1].to_string(),
            name: caps[2].to_string(),
        })
    }

    /// The `namespace/name` identifier used by hub APIs and CLI flags.
    pub fn id(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Deterministic local snapshot directory for this model.
    pub fn local_dir(&self, models_dir: &Path) -> PathBuf {
        models_dir.join(&self.namespace).join(&self.name)
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
