//! Submission domain model.
//!
//! A submission is the user-provided artifact being scored. It is immutable
//! once handed to a task; exactly one of `content`/`file_data` is meaningful
//! for a given kind.

use serde::{Deserialize, Serialize};

/// Kind of artifact a submission carries.
///
/// Closed enum with exhaustive matching everywhere it is dispatched on, so
/// adding a new kind is a compile-time-checked decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    /// A plain-text blob in `content`.
    Text,
    /// A URL in `content`.
    Link,
    /// An uploaded file carried as base64 in `file_data`.
    File,
}

impl SubmissionKind {
    /// String form used in logs and progress events.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Link => "link",
            Self::File => "file",
        }
    }
}

/// Metadata describing an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FileMeta {
    /// Original filename as supplied by the uploader.
    pub filename: String,
    /// Declared MIME type (e.g. `application/pdf`).
    pub mime_type: String,
}

/// A bounty submission handed to a scoring task.
///
/// `file_data` is the base64 transport encoding of the raw file bytes;
/// decoding it (and tolerating a bad encoding) is the scorer's concern,
/// not the caller's.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Submission {
    /// What kind of artifact this is.
    pub kind: SubmissionKind,

    /// Text or URL payload for Text/Link submissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Base64-encoded file bytes for File submissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,

    /// Filename override, preferred over `file_info.filename` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Uploaded-file metadata, if any was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileMeta>,
}

impl Submission {
    /// Builds a text submission.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: SubmissionKind::Text,
            content: Some(content.into()),
            file_data: None,
            file_name: None,
            file_info: None,
        }
    }

    /// Builds a link submission.
    pub fn link(url: impl Into<String>) -> Self {
        Self {
            kind: SubmissionKind::Link,
            content: Some(url.into()),
            file_data: None,
            file_name: None,
            file_info: None,
        }
    }

    /// Builds a file submission from already-encoded file data.
    pub fn file(data_b64: impl Into<String>, file_info: Option<FileMeta>) -> Self {
        Self {
            kind: SubmissionKind::File,
            content: None,
            file_data: Some(data_b64.into()),
            file_name: None,
            file_info,
        }
    }

    /// Best-effort display name for a file submission.
    pub fn display_name(&self) -> &str {
        self.file_name
            .as_deref()
            .or_else(|| self.file_info.as_ref().map(|i| i.filename.as_str()))
            .unwrap_or("unknown")
    }
}
