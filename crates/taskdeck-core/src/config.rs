//! Configuration management for taskdeck.
//!
//! Loads configuration from ${TASKDECK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config template with comments, embedded at compile time.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

/// Env var that overrides the configured API base URL.
pub const API_URL_ENV: &str = "TASKDECK_API_URL";

pub mod paths {
    //! Path resolution for taskdeck configuration and data directories.
    //!
    //! TASKDECK_HOME resolution order:
    //! 1. TASKDECK_HOME environment variable (if set)
    //! 2. ~/.config/taskdeck (default)

    use std::path::PathBuf;

    /// Returns the taskdeck home directory.
    ///
    /// Checks TASKDECK_HOME env var first, falls back to ~/.config/taskdeck.
    /// Without a resolvable home directory the current directory is used.
    pub fn taskdeck_home() -> PathBuf {
        if let Ok(home) = std::env::var("TASKDECK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map_or_else(|| PathBuf::from(".taskdeck"), |h| h.join(".config").join("taskdeck"))
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        taskdeck_home().join("config.toml")
    }

    /// Returns the path to the session token file.
    pub fn session_path() -> PathBuf {
        taskdeck_home().join("session.json")
    }

    /// Returns the path to the log directory.
    pub fn logs_dir() -> PathBuf {
        taskdeck_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the task service (auth and tasks live under it)
    pub api_base_url: String,

    /// Request timeout in seconds (0 keeps the HTTP client default)
    pub request_timeout_secs: u32,

    /// Log filter used when RUST_LOG is not set
    pub log_level: String,
}

impl Config {
    pub const DEFAULT_API_BASE_URL: &str = "https://task-app-8d2x.onrender.com/api";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 0;
    const DEFAULT_LOG_LEVEL: &str = "info";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the API base URL.
    ///
    /// Precedence: explicit override (CLI flag), then `TASKDECK_API_URL`,
    /// then the config file. Empty strings are treated as unset.
    pub fn effective_api_base_url(&self, override_url: Option<&str>) -> Result<String> {
        let env_url = std::env::var(API_URL_ENV).ok();
        let candidates = [
            override_url,
            env_url.as_deref(),
            Some(self.api_base_url.as_str()),
        ];

        let url = candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(Self::DEFAULT_API_BASE_URL);

        validate_url(url)?;
        Ok(url.trim_end_matches('/').to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Saves only the `api_base_url` field to the config file.
    pub fn save_api_base_url(url: &str) -> Result<()> {
        Self::save_api_base_url_to(&paths::config_path(), url)
    }

    /// Saves only the `api_base_url` field to a specific config file path.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_api_base_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        validate_url(url)?;

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            DEFAULT_CONFIG_TEMPLATE.to_string()
        };

        // Parse as editable document (preserves comments and formatting)
        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["api_base_url"] = value(url.trim());

        Self::write_config(path, &doc.to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, DEFAULT_CONFIG_TEMPLATE)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url.trim()).with_context(|| format!("Invalid API base URL: {url}"))?;
    Ok(())
}
