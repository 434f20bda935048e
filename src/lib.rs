//! Paperdeck - a client for an academic-paper sharing platform
//!
//! This library provides the session store, typed API layer, paper
//! detail resolution, browse/filter view, and submission flow behind the
//! paperdeck CLI.

pub mod api;
pub mod browse;
pub mod cli;
pub mod config;
pub mod detail;
pub mod error;
pub mod models;
pub mod session;
pub mod submit;
#[cfg(test)]
pub mod test_utils;

// Re-export Args for the binary
pub use cli::Args;
