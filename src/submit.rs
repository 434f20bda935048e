//! Paper submission: client-side validation, tag accumulation, and the
//! multipart upload.
//!
//! Validation failures never reach the network; backend failures leave
//! the draft intact so the user can correct and resubmit.

use crate::api::PaperApi;
use crate::error::ApiError;
use crate::models::{PaperUpload, User};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MIN_TITLE_LEN: usize = 3;
pub const MIN_DESCRIPTION_LEN: usize = 20;

/// Allowed attachment types, by file extension.
const ALLOWED_TYPES: [(&str, &str); 3] = [
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Title must be at least {MIN_TITLE_LEN} characters long.")]
    TitleTooShort,
    #[error("Description must be at least {MIN_DESCRIPTION_LEN} characters long.")]
    DescriptionTooShort,
    #[error("Please select a category.")]
    MissingCategory,
    #[error("Please select a file to upload.")]
    MissingFile,
    #[error("Invalid file type. Only PDF, DOC, and DOCX are allowed.")]
    InvalidFileType,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("{0}")]
    Invalid(#[from] ValidationError),
    #[error("failed to read file: {0}")]
    File(String),
    #[error("{0}")]
    Api(#[from] ApiError),
}

/// In-progress paper submission.
#[derive(Debug, Clone, Default)]
pub struct PaperDraft {
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub file: Option<PathBuf>,
    tags: Vec<String>,
    pub coauthors: Vec<String>,
    pub meta: String,
}

impl PaperDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a tag. Input is trimmed; empty input and duplicates are
    /// rejected. Returns true when the tag was added.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// All client-side checks, in the order the form reports them.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().len() < MIN_TITLE_LEN {
            return Err(ValidationError::TitleTooShort);
        }
        if self.description.trim().len() < MIN_DESCRIPTION_LEN {
            return Err(ValidationError::DescriptionTooShort);
        }
        if self.category_id.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let Some(file) = self.file.as_deref() else {
            return Err(ValidationError::MissingFile);
        };
        if file_mime(file).is_none() {
            return Err(ValidationError::InvalidFileType);
        }
        Ok(())
    }

    /// Clear the draft after a successful submission.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// MIME type for an allow-listed document extension, None otherwise.
pub fn file_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == ext)
        .map(|(_, mime)| *mime)
}

/// Candidate co-authors for a submission, from the bearer-authenticated
/// author listing. The listing is access-restricted and non-critical:
/// failures are logged and degrade to an empty list, leaving the rest of
/// the submission flow usable.
pub async fn coauthor_candidates(api: &dyn PaperApi, token: &str) -> Vec<User> {
    match api.list_authors(token).await {
        Ok(users) => users,
        Err(e) => {
            eprintln!("[submit] authors unavailable, continuing without: {}", e);
            Vec::new()
        }
    }
}

/// Validate the draft and send it as a multipart upload with the session
/// bearer token. The draft itself is not consumed: on failure the caller
/// keeps it for correction, on success the caller resets it.
pub async fn submit(
    api: &dyn PaperApi,
    token: &str,
    draft: &PaperDraft,
) -> Result<Value, SubmitError> {
    draft.validate()?;

    // validate() guarantees the file is present and allow-listed.
    let path = draft.file.as_deref().ok_or(ValidationError::MissingFile)?;
    let mime = file_mime(path).ok_or(ValidationError::InvalidFileType)?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| SubmitError::File(format!("{}: {}", path.display(), e)))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("paper")
        .to_string();

    let upload = PaperUpload {
        file_name,
        mime_type: mime.to_string(),
        bytes,
        paper_name: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        category_id: draft.category_id.clone(),
        tags: draft.tags.clone(),
        coauthors: draft.coauthors.clone(),
        meta: draft.meta.clone(),
    };

    Ok(api.upload_paper(token, upload).await?)
}
