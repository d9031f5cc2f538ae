//! Error types for tutorchat
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for tutorchat operations
///
/// Covers configuration loading, gateway plumbing, profile storage and the
/// usual IO/serialization failures. Recoverable backend failures during a
/// chat never surface here; the store turns them into fallbacks.
#[derive(Error, Debug)]
pub enum TutorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Gateway construction or one-shot command failures
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Profile validation or storage errors
    #[error("Profile error: {0}")]
    Profile(String),

    /// Interactive input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Readline errors from the interactive prompt
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Result type alias for tutorchat operations
///
/// Uses `anyhow::Error` so callers can attach context while propagating.
pub type Result<T> = anyhow::Result<T>;
