//! Wire types for the paper-sharing backend.
//!
//! The backend is loose about shapes: identifiers arrive as `id` or `_id`,
//! as strings or numbers, and list payloads arrive bare, wrapped in
//! `{"data": ...}`, or double-wrapped in `{"data": {"data": ...}}`.
//! Everything is normalized here, once, at the decode boundary — entity
//! identifiers become canonical `String`s and envelopes are peeled before
//! deserialization, so the rest of the crate never sees the mess.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Deserialize an identifier that may be a JSON string or number into a
/// canonical string. Missing ids default to "" via `#[serde(default)]`.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Num(i64),
    }
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => s,
        RawId::Num(n) => n.to_string(),
    })
}

/// Same as [`id_string`] but tolerates null/absent values.
fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Num(i64),
        None,
    }
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => Some(s),
        RawId::Num(n) => Some(n.to_string()),
        RawId::None => None,
    })
}

/// Deserialize a list of identifiers, coercing each element.
fn id_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Value> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}

/// A registered user of the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id", deserialize_with = "id_string", default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub fname: String,
    #[serde(default)]
    pub lname: String,
    #[serde(default)]
    pub institution: Option<String>,
}

impl User {
    /// Preferred display name: "first last", then username, then email.
    pub fn display_name(&self) -> String {
        if !self.fname.is_empty() && !self.lname.is_empty() {
            format!("{} {}", self.fname, self.lname)
        } else if !self.username.is_empty() {
            self.username.clone()
        } else {
            self.email.clone()
        }
    }
}

/// A submitted research paper record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(alias = "_id", deserialize_with = "id_string", default)]
    pub id: String,
    #[serde(rename = "paper_name", alias = "title", default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "opt_id_string", default)]
    pub category_id: Option<String>,
    #[serde(deserialize_with = "id_string_list", default)]
    pub coauthors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(deserialize_with = "opt_id_string", default)]
    pub publisher_id: Option<String>,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Paper {
    /// Resolve this paper's file reference to a fetchable URL, or None if
    /// the paper carries no file.
    pub fn resolved_file_url(&self, base_url: &str) -> Option<String> {
        self.file_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|u| resolve_file_url(base_url, u))
    }
}

/// A classification facet assigned to papers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "_id", deserialize_with = "id_string", default)]
    pub id: String,
    #[serde(rename = "category_name", alias = "category", default)]
    pub name: String,
}

/// A free-text tag known to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(alias = "_id", deserialize_with = "id_string", default)]
    pub id: String,
    #[serde(rename = "tag_name", alias = "name", alias = "tag", default)]
    pub name: String,
}

/// Response from the login/register endpoints. A successful response
/// carries both `token` and `user`; failures carry `error` or `message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    /// A response only counts as a successful authentication when it
    /// contains both halves of the session.
    pub fn is_success(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

/// Fields for the registration endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub institution: String,
    pub fname: String,
    pub lname: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A fully validated paper submission, ready to be sent as multipart.
#[derive(Debug, Clone)]
pub struct PaperUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub paper_name: String,
    pub description: String,
    pub category_id: String,
    pub tags: Vec<String>,
    pub coauthors: Vec<String>,
    pub meta: String,
}

/// JSON body for the paper update endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PaperUpdate {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Peel response envelopes down to the payload. Accepts `{"data": T}`,
/// `{"data": {"data": T}}`, or bare `T`, mirroring the backend's
/// inconsistent wrapping across routes.
pub fn peel_envelope(mut value: Value) -> Value {
    loop {
        match value {
            Value::Object(ref mut map) if map.contains_key("data") => {
                value = map.remove("data").unwrap_or(Value::Null);
            }
            _ => return value,
        }
    }
}

/// Rewrite a paper's file reference into a public URL.
///
/// Absolute URLs pass through untouched. Relative references use the
/// legacy `../uploads` prefix, which maps to the `/uploads` route served
/// next to the API — the trailing `/api` segment of the base URL is
/// stripped before joining.
pub fn resolve_file_url(base_url: &str, file_url: &str) -> String {
    if file_url.starts_with("http") {
        return file_url.to_string();
    }
    let root = base_url.trim_end_matches('/');
    let root = root.strip_suffix("/api").unwrap_or(root);
    let path = file_url.replacen("../uploads", "/uploads", 1);
    format!("{}{}", root, path)
}

/// Fixed palette for tag badges.
const TAG_PALETTE: [&str; 6] = ["blue", "green", "purple", "amber", "rose", "teal"];

/// Deterministic color for a tag: same text, same color, every render.
pub fn tag_color(tag: &str) -> &'static str {
    let digest = Sha256::digest(tag.as_bytes());
    TAG_PALETTE[digest[0] as usize % TAG_PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_aliases() {
        let from_mongo: User =
            serde_json::from_str(r#"{"_id": "abc123", "email": "a@b.edu"}"#).unwrap();
        assert_eq!(from_mongo.id, "abc123");

        let from_sql: User = serde_json::from_str(r#"{"id": 42, "email": "a@b.edu"}"#).unwrap();
        assert_eq!(from_sql.id, "42");
    }

    #[test]
    fn test_paper_defaults() {
        let paper: Paper = serde_json::from_str(r#"{"_id": "p1", "paper_name": "Title"}"#).unwrap();
        assert_eq!(paper.id, "p1");
        assert_eq!(paper.name, "Title");
        assert!(paper.coauthors.is_empty());
        assert!(paper.tags.is_empty());
        assert!(paper.category_id.is_none());
        assert!(paper.created_at.is_none());
    }

    #[test]
    fn test_paper_numeric_category_id() {
        let paper: Paper =
            serde_json::from_str(r#"{"_id": "p1", "paper_name": "T", "category_id": 7}"#).unwrap();
        assert_eq!(paper.category_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_paper_coauthor_id_coercion() {
        let paper: Paper = serde_json::from_str(
            r#"{"_id": "p1", "paper_name": "T", "coauthors": ["u1", 2]}"#,
        )
        .unwrap();
        assert_eq!(paper.coauthors, vec!["u1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_category_name_aliases() {
        let cat: Category =
            serde_json::from_str(r#"{"_id": "c1", "category_name": "Physics"}"#).unwrap();
        assert_eq!(cat.name, "Physics");

        let cat: Category = serde_json::from_str(r#"{"_id": "c2", "category": "Biology"}"#).unwrap();
        assert_eq!(cat.name, "Biology");
    }

    #[test]
    fn test_peel_envelope_bare() {
        let v = serde_json::json!([{"_id": "p1"}]);
        assert_eq!(peel_envelope(v.clone()), v);
    }

    #[test]
    fn test_peel_envelope_single() {
        let v = serde_json::json!({"data": [1, 2]});
        assert_eq!(peel_envelope(v), serde_json::json!([1, 2]));
    }

    #[test]
    fn test_peel_envelope_double() {
        let v = serde_json::json!({"data": {"data": [1, 2]}});
        assert_eq!(peel_envelope(v), serde_json::json!([1, 2]));
    }

    #[test]
    fn test_auth_response_success_requires_both() {
        let full: AuthResponse = serde_json::from_str(
            r#"{"token": "t", "user": {"_id": "u1", "email": "a@b.edu"}}"#,
        )
        .unwrap();
        assert!(full.is_success());

        let token_only: AuthResponse = serde_json::from_str(r#"{"token": "t"}"#).unwrap();
        assert!(!token_only.is_success());

        let failed: AuthResponse =
            serde_json::from_str(r#"{"error": "bad credentials"}"#).unwrap();
        assert!(!failed.is_success());
        assert_eq!(failed.error_message(), Some("bad credentials"));
    }

    #[test]
    fn test_resolve_file_url_absolute() {
        assert_eq!(
            resolve_file_url("http://localhost:5000/api", "https://cdn.example.com/p.pdf"),
            "https://cdn.example.com/p.pdf"
        );
    }

    #[test]
    fn test_resolve_file_url_legacy_relative() {
        assert_eq!(
            resolve_file_url("http://localhost:5000/api", "../uploads/p.pdf"),
            "http://localhost:5000/uploads/p.pdf"
        );
        // Trailing slash on the base URL
        assert_eq!(
            resolve_file_url("http://localhost:5000/api/", "../uploads/p.pdf"),
            "http://localhost:5000/uploads/p.pdf"
        );
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut user = User {
            id: "u1".into(),
            email: "a@b.edu".into(),
            username: "asmith".into(),
            fname: "Ada".into(),
            lname: "Smith".into(),
            institution: None,
        };
        assert_eq!(user.display_name(), "Ada Smith");
        user.lname.clear();
        assert_eq!(user.display_name(), "asmith");
        user.username.clear();
        assert_eq!(user.display_name(), "a@b.edu");
    }

    #[test]
    fn test_tag_color_deterministic() {
        assert_eq!(tag_color("quantum"), tag_color("quantum"));
        assert!(TAG_PALETTE.contains(&tag_color("anything")));
    }
}
