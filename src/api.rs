//! Typed wrappers over the backend REST endpoints.
//!
//! Pure request/response plumbing: no caching, no retries. Every method
//! returns `Result<_, ApiError>` so failures stay visible to callers.
//! The [`PaperApi`] trait fronts the HTTP client so session, detail, and
//! browse logic can be exercised against a mock.

use crate::error::ApiError;
use crate::models::{
    peel_envelope, AuthResponse, Category, Paper, PaperUpdate, PaperUpload, SignupRequest, Tag,
    User,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Backend operations used by the rest of the crate.
#[async_trait]
pub trait PaperApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;
    async fn signup(&self, req: &SignupRequest) -> Result<AuthResponse, ApiError>;
    async fn logout(&self, token: &str) -> Result<(), ApiError>;

    async fn list_papers(&self) -> Result<Vec<Paper>, ApiError>;
    async fn papers_by_publisher(&self, publisher_id: &str) -> Result<Vec<Paper>, ApiError>;
    async fn get_paper(&self, id: &str) -> Result<Paper, ApiError>;
    async fn upload_paper(&self, token: &str, upload: PaperUpload) -> Result<Value, ApiError>;
    async fn update_paper(&self, token: &str, update: &PaperUpdate) -> Result<Value, ApiError>;
    async fn delete_paper(&self, token: &str, id: &str) -> Result<(), ApiError>;

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError>;
    async fn list_authors(&self, token: &str) -> Result<Vec<User>, ApiError>;
    async fn list_users(&self, token: Option<&str>) -> Result<Vec<User>, ApiError>;
}

/// HTTP client for the backend API.
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a response body, peeling whatever envelope the route uses.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        if !(200..300).contains(&status) {
            return Err(ApiError::from_status(status, &body));
        }
        let value: Value =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        serde_json::from_value(peel_envelope(value)).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Like [`Self::decode`] but discards the payload.
    async fn check(resp: reqwest::Response) -> Result<(), ApiError> {
        let status = resp.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }
}

/// Interpret a login/register response. The backend answers failed
/// credential checks with an error-shaped JSON body; that is returned to
/// the caller as a (non-panicking) `AuthResponse` so the session store can
/// inspect it. Error statuses without a usable body become typed errors;
/// a success status with an unparsable body is a decode failure.
fn auth_outcome(status: u16, body: &str) -> Result<AuthResponse, ApiError> {
    let parsed = serde_json::from_str::<AuthResponse>(body);
    if (200..300).contains(&status) {
        return parsed.map_err(|e| ApiError::Decode(e.to_string()));
    }
    match parsed {
        Ok(resp) if resp.error_message().is_some() => Ok(resp),
        _ => Err(ApiError::from_status(status, body)),
    }
}

#[async_trait]
impl PaperApi for Client {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let resp = self
            .http
            .post(self.endpoint("/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        auth_outcome(status, &body)
    }

    async fn signup(&self, req: &SignupRequest) -> Result<AuthResponse, ApiError> {
        let resp = self
            .http
            .post(self.endpoint("/auth/register"))
            .json(req)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        auth_outcome(status, &body)
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .get(self.endpoint("/logout"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(resp).await
    }

    async fn list_papers(&self) -> Result<Vec<Paper>, ApiError> {
        let resp = self.http.get(self.endpoint("/papers")).send().await?;
        Self::decode(resp).await
    }

    async fn papers_by_publisher(&self, publisher_id: &str) -> Result<Vec<Paper>, ApiError> {
        let resp = self
            .http
            .get(self.endpoint("/papers"))
            .query(&[("publisher_id", publisher_id)])
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn get_paper(&self, id: &str) -> Result<Paper, ApiError> {
        let resp = self
            .http
            .get(self.endpoint(&format!("/papers/{}", id)))
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn upload_paper(&self, token: &str, upload: PaperUpload) -> Result<Value, ApiError> {
        let file_part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let tags = serde_json::to_string(&upload.tags)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let coauthors = serde_json::to_string(&upload.coauthors)
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let form = Form::new()
            .part("file", file_part)
            .text("paper_name", upload.paper_name)
            .text("description", upload.description)
            .text("category_id", upload.category_id)
            .text("tags", tags)
            .text("coauthors", coauthors)
            .text("meta", upload.meta);

        let resp = self
            .http
            .post(self.endpoint("/papers/local"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn update_paper(&self, token: &str, update: &PaperUpdate) -> Result<Value, ApiError> {
        let resp = self
            .http
            .put(self.endpoint("/papers/"))
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn delete_paper(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.endpoint(&format!("/papers/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(resp).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let resp = self.http.get(self.endpoint("/categories")).send().await?;
        Self::decode(resp).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let resp = self.http.get(self.endpoint("/tags")).send().await?;
        Self::decode(resp).await
    }

    async fn list_authors(&self, token: &str) -> Result<Vec<User>, ApiError> {
        let resp = self
            .http
            .get(self.endpoint("/users/authors"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn list_users(&self, token: Option<&str>) -> Result<Vec<User>, ApiError> {
        let mut req = self.http.get(self.endpoint("/users/users"));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        Self::decode(resp).await
    }
}
