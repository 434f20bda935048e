//! Typed errors for the backend API boundary.
//!
//! Every call into the API layer returns `Result<_, ApiError>` so callers
//! can distinguish "not found" from "access denied" from transport trouble
//! instead of pattern-matching on message strings.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("access denied")]
    AccessDenied,

    #[error("authentication required")]
    Unauthorized,

    #[error("no paper ID provided")]
    MissingId,

    #[error("backend error {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map an HTTP error status and response body to a typed error.
    /// The body's `message` or `error` field is used when present,
    /// otherwise the raw body is carried through.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied,
            404 => ApiError::NotFound,
            _ => ApiError::Backend {
                status,
                message: extract_message(body),
            },
        }
    }

    /// True for failures worth suggesting a manual retry for (the backend
    /// was unreachable or misbehaving, as opposed to rejecting the request).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_) | ApiError::Backend { status: 500..=599, .. }
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Pull a human-readable message out of an error body.
/// Backends here answer with `{"message": ...}` or `{"error": ...}`
/// depending on the route; fall back to the body text itself.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request failed".to_string()
    } else {
        trimmed.to_string()
    }
}
