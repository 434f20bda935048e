//! Session store: the single source of truth for "who is logged in".
//!
//! Identity is persisted as two files in the state directory, written and
//! cleared together: `token` (the opaque bearer string) and `user.json`
//! (the serialized [`User`] record). Only the four operations here —
//! `initialize`, `login`, `signup`, `logout` — touch those files.

use crate::api::PaperApi;
use crate::error::ApiError;
use crate::models::{AuthResponse, SignupRequest, User};
use std::fs;
use std::path::{Path, PathBuf};

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

pub struct SessionStore {
    dir: PathBuf,
    token: Option<String>,
    user: Option<User>,
    loading: bool,
}

impl SessionStore {
    /// A fresh store. No identity is known until [`Self::initialize`] runs.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            token: None,
            user: None,
            loading: true,
        }
    }

    /// Rehydrate the session from durable storage. Both keys must be
    /// present for the stored identity to be trusted; a partial pair is
    /// treated as logged out. No server round-trip is made. The loading
    /// flag drops to false exactly once, on every path.
    pub fn initialize(&mut self) {
        let token = fs::read_to_string(self.dir.join(TOKEN_FILE))
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let user = fs::read_to_string(self.dir.join(USER_FILE))
            .ok()
            .and_then(|raw| serde_json::from_str::<User>(&raw).ok());

        match (token, user) {
            (Some(token), Some(user)) => {
                self.token = Some(token);
                self.user = Some(user);
            }
            _ => {
                self.token = None;
                self.user = None;
            }
        }
        self.loading = false;
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Authenticate against the backend. On a response carrying both a
    /// token and a user record, the identity is committed to memory and
    /// durable storage. Any other outcome — an error-shaped response or a
    /// transport failure — leaves the current state untouched and is
    /// handed back to the caller.
    pub async fn login(
        &mut self,
        api: &dyn PaperApi,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        self.loading = true;
        let result = api.login(email, password).await;
        self.settle(&result);
        result
    }

    /// Register a new account; same contract as [`Self::login`].
    pub async fn signup(
        &mut self,
        api: &dyn PaperApi,
        req: &SignupRequest,
    ) -> Result<AuthResponse, ApiError> {
        self.loading = true;
        let result = api.signup(req).await;
        self.settle(&result);
        result
    }

    /// End the session. The backend logout call is best-effort: whether it
    /// succeeds or not, both storage keys are removed and the in-memory
    /// identity is cleared. Never returns an error.
    pub async fn logout(&mut self, api: &dyn PaperApi) {
        self.loading = true;
        if let Some(token) = self.token.clone() {
            if let Err(e) = api.logout(&token).await {
                eprintln!("[session] logout call failed (clearing locally): {}", e);
            }
        }
        self.clear_storage();
        self.token = None;
        self.user = None;
        self.loading = false;
    }

    /// Commit or reject an auth outcome, always lowering the loading flag.
    fn settle(&mut self, result: &Result<AuthResponse, ApiError>) {
        match result {
            Ok(resp) => {
                if let (Some(token), Some(user)) = (resp.token.clone(), resp.user.clone()) {
                    self.persist(&token, &user);
                    self.token = Some(token);
                    self.user = Some(user);
                } else if let Some(msg) = resp.error_message() {
                    eprintln!("[session] authentication rejected: {}", msg);
                }
            }
            Err(e) => eprintln!("[session] authentication failed: {}", e),
        }
        self.loading = false;
    }

    /// Write both keys together. An IO failure here is logged rather than
    /// propagated; the in-memory session stays valid for this process.
    fn persist(&self, token: &str, user: &User) {
        let write = || -> std::io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            fs::write(self.dir.join(TOKEN_FILE), token)?;
            let json = serde_json::to_string_pretty(user)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            fs::write(self.dir.join(USER_FILE), json)?;
            Ok(())
        };
        if let Err(e) = write() {
            eprintln!("[session] failed to persist session: {}", e);
        }
    }

    /// Remove both keys together.
    fn clear_storage(&self) {
        for name in [TOKEN_FILE, USER_FILE] {
            let path = self.dir.join(name);
            if path.exists() {
                if let Err(e) = fs::remove_file(&path) {
                    eprintln!("[session] failed to remove {}: {}", path.display(), e);
                }
            }
        }
    }
}
