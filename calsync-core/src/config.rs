//! Layered calsync configuration.
//!
//! Values come from `~/.config/calsync/config.toml` (optional) overlaid with
//! `CALSYNC_*` environment variables, e.g.
//! `CALSYNC_GOOGLE__MAX_AUTH_ATTEMPTS=5`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalsyncError, CalsyncResult};

const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_REQUEST_TIMEOUT: &str = "30s";
const DEFAULT_MAX_AUTH_ATTEMPTS: u32 = 3;

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_request_timeout() -> String {
    DEFAULT_REQUEST_TIMEOUT.to_string()
}

fn default_max_auth_attempts() -> u32 {
    DEFAULT_MAX_AUTH_ATTEMPTS
}

/// Settings for talking to the Google Calendar API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleApiConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Per-request timeout, in humantime form ("30s", "2m")
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,

    /// Total number of sends allowed for one request that keeps getting 401
    #[serde(default = "default_max_auth_attempts")]
    pub max_auth_attempts: u32,
}

impl Default for GoogleApiConfig {
    fn default() -> Self {
        GoogleApiConfig {
            api_base_url: default_api_base_url(),
            token_url: default_token_url(),
            request_timeout: default_request_timeout(),
            max_auth_attempts: default_max_auth_attempts(),
        }
    }
}

impl GoogleApiConfig {
    pub fn request_timeout(&self) -> CalsyncResult<Duration> {
        humantime::parse_duration(&self.request_timeout).map_err(|e| {
            CalsyncError::Config(format!(
                "Invalid google.request_timeout '{}': {}",
                self.request_timeout, e
            ))
        })
    }
}

/// Global configuration at ~/.config/calsync/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalsyncConfig {
    #[serde(default)]
    pub google: GoogleApiConfig,

    /// Where sync checkpoints are kept (defaults to the config directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_file: Option<PathBuf>,
}

impl CalsyncConfig {
    /// ~/.config/calsync (platform equivalent elsewhere)
    pub fn base_dir() -> CalsyncResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| CalsyncError::Config("Could not determine config directory".into()))?
            .join("calsync"))
    }

    pub fn config_path() -> CalsyncResult<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    pub fn load() -> CalsyncResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit file (which may be missing), then apply
    /// environment overrides.
    pub fn load_from(path: &Path) -> CalsyncResult<Self> {
        let config: CalsyncConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("CALSYNC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CalsyncError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalsyncError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CalsyncResult<()> {
        self.google.request_timeout()?;

        if self.google.max_auth_attempts == 0 {
            return Err(CalsyncError::Config(
                "google.max_auth_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }

    pub fn checkpoint_path(&self) -> CalsyncResult<PathBuf> {
        match &self.checkpoint_file {
            Some(path) => Ok(PathBuf::from(
                shellexpand::tilde(&path.to_string_lossy()).into_owned(),
            )),
            None => Ok(Self::base_dir()?.join("checkpoints.toml")),
        }
    }
}
