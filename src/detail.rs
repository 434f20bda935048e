//! Paper detail resolution: join one paper with the category and user
//! collections it references.
//!
//! The three fetches are fired concurrently. Only the paper fetch is
//! fatal; categories and users are best-effort and degrade to empty so
//! the paper itself remains presentable behind partial outages (the user
//! listing in particular is access-restricted and routinely 403s).

use crate::api::PaperApi;
use crate::error::ApiError;
use crate::models::{Category, Paper, User};

/// A paper together with the collections needed to render it.
#[derive(Debug)]
pub struct PaperContext {
    pub paper: Paper,
    pub categories: Vec<Category>,
    pub users: Vec<User>,
}

/// Resolve a paper's full display context.
///
/// An empty id is rejected immediately without issuing any request. The
/// paper fetch keeps its typed error (not-found vs access-denied vs
/// generic); category and user failures are logged and degrade to empty.
pub async fn load_paper_context(
    api: &dyn PaperApi,
    token: Option<&str>,
    paper_id: &str,
) -> Result<PaperContext, ApiError> {
    if paper_id.trim().is_empty() {
        return Err(ApiError::MissingId);
    }

    let (paper, categories, users) = tokio::join!(
        api.get_paper(paper_id),
        api.list_categories(),
        api.list_users(token),
    );

    let paper = paper?;

    let categories = categories.unwrap_or_else(|e| {
        eprintln!("[detail] categories unavailable, continuing without: {}", e);
        Vec::new()
    });
    let users = users.unwrap_or_else(|e| {
        eprintln!("[detail] users unavailable, continuing without: {}", e);
        Vec::new()
    });

    Ok(PaperContext {
        paper,
        categories,
        users,
    })
}

impl PaperContext {
    /// Display name of the paper's category, or "Unknown" when the
    /// reference doesn't resolve (no categories loaded, or no match).
    pub fn category_name(&self) -> String {
        let Some(category_id) = self.paper.category_id.as_deref() else {
            return "Unknown".to_string();
        };
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Display name for a user id. Falls back to a short handle derived
    /// from the id when the user collection is empty or has no match.
    pub fn user_name(&self, user_id: &str) -> String {
        if user_id.is_empty() {
            return "Unknown User".to_string();
        }
        match self.users.iter().find(|u| u.id == user_id) {
            Some(user) => {
                let name = user.display_name();
                if name.is_empty() {
                    short_handle(user_id)
                } else {
                    name
                }
            }
            None => short_handle(user_id),
        }
    }

    /// Display names for the paper's co-authors, in order.
    pub fn coauthor_names(&self) -> Vec<String> {
        self.paper
            .coauthors
            .iter()
            .map(|id| self.user_name(id))
            .collect()
    }
}

/// "User abcd" from the trailing characters of an identifier.
fn short_handle(user_id: &str) -> String {
    let tail: String = {
        let chars: Vec<char> = user_id.chars().collect();
        let start = chars.len().saturating_sub(4);
        chars[start..].iter().collect()
    };
    format!("User {}", tail)
}

/// User-facing description of a failed paper resolution.
pub fn describe_fetch_error(err: &ApiError) -> String {
    match err {
        ApiError::MissingId => "No paper ID provided.".to_string(),
        ApiError::NotFound => "Paper not found. Please check the paper ID.".to_string(),
        ApiError::AccessDenied => {
            "Access denied. You don't have permission to view this paper.".to_string()
        }
        other => format!("Failed to load paper: {}", other),
    }
}
