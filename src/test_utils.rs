//! Mock backend for exercising session, detail, browse, and submit logic
//! without a network.

use crate::api::PaperApi;
use crate::error::ApiError;
use crate::models::{
    AuthResponse, Category, Paper, PaperUpdate, PaperUpload, SignupRequest, Tag, User,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

/// Canned-response implementation of [`PaperApi`]. Every call is recorded
/// so tests can assert which requests were (or were not) issued.
pub struct MockApi {
    login_result: Result<AuthResponse, ApiError>,
    signup_result: Result<AuthResponse, ApiError>,
    logout_result: Result<(), ApiError>,
    papers_result: Result<Vec<Paper>, ApiError>,
    paper_result: Result<Paper, ApiError>,
    upload_result: Result<Value, ApiError>,
    categories_result: Result<Vec<Category>, ApiError>,
    tags_result: Result<Vec<Tag>, ApiError>,
    users_result: Result<Vec<User>, ApiError>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            login_result: Err(ApiError::Transport("mock: login not configured".into())),
            signup_result: Err(ApiError::Transport("mock: signup not configured".into())),
            logout_result: Ok(()),
            papers_result: Ok(Vec::new()),
            paper_result: Err(ApiError::NotFound),
            upload_result: Ok(Value::Null),
            categories_result: Ok(Vec::new()),
            tags_result: Ok(Vec::new()),
            users_result: Ok(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_login(mut self, result: Result<AuthResponse, ApiError>) -> Self {
        self.login_result = result;
        self
    }

    pub fn with_signup(mut self, result: Result<AuthResponse, ApiError>) -> Self {
        self.signup_result = result;
        self
    }

    pub fn with_logout(mut self, result: Result<(), ApiError>) -> Self {
        self.logout_result = result;
        self
    }

    pub fn with_papers(mut self, result: Result<Vec<Paper>, ApiError>) -> Self {
        self.papers_result = result;
        self
    }

    pub fn with_paper(mut self, result: Result<Paper, ApiError>) -> Self {
        self.paper_result = result;
        self
    }

    pub fn with_upload(mut self, result: Result<Value, ApiError>) -> Self {
        self.upload_result = result;
        self
    }

    pub fn with_categories(mut self, result: Result<Vec<Category>, ApiError>) -> Self {
        self.categories_result = result;
        self
    }

    pub fn with_tags(mut self, result: Result<Vec<Tag>, ApiError>) -> Self {
        self.tags_result = result;
        self
    }

    pub fn with_users(mut self, result: Result<Vec<User>, ApiError>) -> Self {
        self.users_result = result;
        self
    }

    /// Names of the trait methods invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().expect("calls lock").push(call.to_string());
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaperApi for MockApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<AuthResponse, ApiError> {
        self.record("login");
        self.login_result.clone()
    }

    async fn signup(&self, _req: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.record("signup");
        self.signup_result.clone()
    }

    async fn logout(&self, _token: &str) -> Result<(), ApiError> {
        self.record("logout");
        self.logout_result.clone()
    }

    async fn list_papers(&self) -> Result<Vec<Paper>, ApiError> {
        self.record("list_papers");
        self.papers_result.clone()
    }

    async fn papers_by_publisher(&self, _publisher_id: &str) -> Result<Vec<Paper>, ApiError> {
        self.record("papers_by_publisher");
        self.papers_result.clone()
    }

    async fn get_paper(&self, _id: &str) -> Result<Paper, ApiError> {
        self.record("get_paper");
        self.paper_result.clone()
    }

    async fn upload_paper(&self, _token: &str, _upload: PaperUpload) -> Result<Value, ApiError> {
        self.record("upload_paper");
        self.upload_result.clone()
    }

    async fn update_paper(&self, _token: &str, _update: &PaperUpdate) -> Result<Value, ApiError> {
        self.record("update_paper");
        self.upload_result.clone()
    }

    async fn delete_paper(&self, _token: &str, _id: &str) -> Result<(), ApiError> {
        self.record("delete_paper");
        self.logout_result.clone()
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record("list_categories");
        self.categories_result.clone()
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.record("list_tags");
        self.tags_result.clone()
    }

    async fn list_authors(&self, _token: &str) -> Result<Vec<User>, ApiError> {
        self.record("list_authors");
        self.users_result.clone()
    }

    async fn list_users(&self, _token: Option<&str>) -> Result<Vec<User>, ApiError> {
        self.record("list_users");
        self.users_result.clone()
    }
}

/// A paper with sensible defaults for tests.
pub fn paper(id: &str, name: &str, category_id: Option<&str>) -> Paper {
    Paper {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        category_id: category_id.map(str::to_string),
        coauthors: Vec::new(),
        tags: Vec::new(),
        meta: None,
        file_url: None,
        publisher_id: None,
        created_at: None,
    }
}

pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
    }
}
