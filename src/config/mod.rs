//! Configuration management for ForgeML

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Production API base URL, used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://api.forgeml.dev/api/v1";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API base URL (overridden by `--api-url` / `FORGEML_API_URL`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Session token issued by the auth provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Defaults applied to every training request
    #[serde(default)]
    pub training: TrainingDefaults,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Training request defaults that differ between deployments.
///
/// Some deployments train on a fixed GPU class and do not accept a
/// `model_type` field; both are configured here instead of in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDefaults {
    /// GPU type used when a request does not name one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_type: Option<String>,

    /// Model type used when a request does not name one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,

    /// Whether the `model_type` field is sent at all
    #[serde(default = "default_send_model_type")]
    pub send_model_type: bool,
}

fn default_send_model_type() -> bool {
    true
}

impl Default for TrainingDefaults {
    fn default() -> Self {
        Self {
            gpu_type: None,
            model_type: None,
            send_model_type: default_send_model_type(),
        }
    }
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Default page size for project listings
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Number of log lines fetched per poll
    #[serde(default = "default_log_lines")]
    pub log_lines: usize,
}

fn default_page_size() -> usize {
    20
}

fn default_log_lines() -> usize {
    50
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            log_lines: default_log_lines(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".forgeml").join("config.yaml"))
    }

    /// Resolve an optional override into a concrete config path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional path (defaults to ~/.forgeml/config.yaml)
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to an optional path
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Token lives in this file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Resolve the API base URL: explicit override first, then the file, then the default.
    pub fn api_url_or_default(&self, override_url: Option<&str>) -> String {
        override_url
            .map(str::to_string)
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Validate that a session token is present
    pub fn validate_auth(&self) -> Result<()> {
        match self.api_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingApiToken.into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            api_token: None,
            training: TrainingDefaults::default(),
            preferences: Preferences::default(),
        }
    }
}
