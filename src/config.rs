//! Runtime configuration: backend base URL and local state directory.

use std::path::PathBuf;

/// Default backend when nothing is configured. Matches the dev server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API, e.g. `https://papers.example.edu/api`.
    pub base_url: String,
    /// Directory holding the persisted session (`token`, `user.json`).
    pub state_dir: PathBuf,
}

impl Config {
    /// Resolve configuration from explicit overrides, then the environment
    /// (`PAPERDECK_API_URL`, `PAPERDECK_STATE_DIR`), then defaults.
    pub fn resolve(base_url: Option<&str>, state_dir: Option<&str>) -> Self {
        let base_url = base_url
            .map(str::to_string)
            .or_else(|| std::env::var("PAPERDECK_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let state_dir = state_dir
            .map(PathBuf::from)
            .or_else(|| std::env::var("PAPERDECK_STATE_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(default_state_dir);

        Self { base_url, state_dir }
    }
}

/// `~/.paperdeck`, falling back to the current directory when the home
/// directory can't be determined.
fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".paperdeck")
}
