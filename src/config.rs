//! Configuration management for tutorchat
//!
//! Configuration is layered: YAML file (or defaults when it is missing),
//! then `TUTORCHAT_*` environment variables, then CLI flags.

use crate::error::{Result, TutorError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure for tutorchat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Who is chatting
    #[serde(default)]
    pub user: UserConfig,
    /// Interactive chat behavior
    #[serde(default)]
    pub chat: ChatConfig,
    /// Local learner profile
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Backend origin; API paths are resolved beneath it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds; unset means no client-side timeout
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

/// Identity passed to the backend
///
/// When `id` is unset the profile's id is used, and failing that the
/// anonymous pseudo-user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Backend user identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Display name used in the welcome message
    #[serde(default)]
    pub name: Option<String>,
}

/// Interactive chat behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Show `HH:MM` next to each message
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
    /// Ask before `/clear` deletes a session
    #[serde(default = "default_true")]
    pub confirm_clear: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            confirm_clear: true,
        }
    }
}

/// Local learner profile settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Profile file; defaults to the platform data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Parse a YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TutorError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| TutorError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("TUTORCHAT_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: TUTORCHAT_BASE_URL");
            self.gateway.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("TUTORCHAT_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(v) => self.gateway.timeout_seconds = Some(v),
                Err(_) => tracing::warn!("Invalid TUTORCHAT_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(user_id) = std::env::var("TUTORCHAT_USER_ID") {
            self.user.id = Some(user_id);
        }

        if let Ok(user_name) = std::env::var("TUTORCHAT_USER_NAME") {
            self.user.name = Some(user_name);
        }

        if let Ok(profile) = std::env::var("TUTORCHAT_PROFILE") {
            self.profile.path = Some(PathBuf::from(profile));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            self.gateway.base_url = base_url.clone();
        }
        if let Some(user) = &cli.user {
            self.user.id = Some(user.clone());
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not an http(s) URL, the user id is
    /// blank, or the timeout is zero
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.gateway.base_url).map_err(|e| {
            TutorError::Config(format!(
                "Invalid gateway.base_url '{}': {}",
                self.gateway.base_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TutorError::Config(format!(
                "gateway.base_url must use http or https, got '{}'",
                url.scheme()
            ))
            .into());
        }

        if self.gateway.timeout_seconds == Some(0) {
            return Err(TutorError::Config(
                "gateway.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if let Some(id) = &self.user.id {
            if id.trim().is_empty() {
                return Err(TutorError::Config("user.id cannot be empty".to_string()).into());
            }
        }

        Ok(())
    }
}
