//! Session files that keep an account's OAuth tokens, and the
//! `TokenSource` built on them.
//!
//! Layout under the calsync config directory:
//!   app_config.toml          OAuth client id and secret (user-provided)
//!   sessions/<account>.toml  access token, refresh token, expiry
//!
//! There is no interactive consent flow; a refresh token obtained
//! elsewhere is imported with `calsync auth`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GoogleError, GoogleResult};
use crate::token::TokenSource;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl SessionData {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// OAuth client the refresh-token grant is made with.
#[derive(Debug, Deserialize)]
struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("app_config.toml");

        let contents = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "Google OAuth client not configured. Create {} with \
                `client_id` and `client_secret` from \
                https://console.cloud.google.com/apis/credentials",
                path.display()
            )
        })?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse OAuth client from {}", path.display()))
    }
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

/// Reads tokens from `<dir>/sessions/<account>.toml`, refreshing them
/// against the OAuth token endpoint when expired or when asked to.
pub struct SessionTokenSource {
    dir: PathBuf,
    token_url: String,
    http: reqwest::Client,
}

impl SessionTokenSource {
    pub fn new(dir: impl Into<PathBuf>, token_url: impl Into<String>) -> Self {
        SessionTokenSource {
            dir: dir.into(),
            token_url: token_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn path_for_account(&self, account: &str) -> PathBuf {
        let account_slug = account.replace(['/', '\\', ':'], "_");

        self.dir
            .join("sessions")
            .join(format!("{}.toml", account_slug))
    }

    /// Store a refresh token for `account`. The first token request
    /// exchanges it for an access token.
    pub fn import(&self, account: &str, refresh_token: &str) -> Result<()> {
        let data = SessionData {
            access_token: String::new(),
            refresh_token: refresh_token.to_string(),
            expires_at: Utc::now() - Duration::seconds(1),
        };

        self.save(account, &data)
    }

    fn load(&self, account: &str) -> Result<SessionData> {
        let path = self.path_for_account(account);

        if !path.exists() {
            anyhow::bail!(
                "Google OAuth session for {} not found!\n\
                Run `calsync auth {} --refresh-token <token>` first.",
                account,
                account
            );
        }

        let contents = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read Google OAuth session from {}", path.display())
        })?;

        toml::from_str(&contents).with_context(|| {
            format!("Failed to parse Google OAuth session from {}", path.display())
        })
    }

    fn save(&self, account: &str, data: &SessionData) -> Result<()> {
        let contents = toml::to_string_pretty(data).context("Failed to serialize session")?;
        let path = self.path_for_account(account);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    async fn refresh(&self, account: &str, data: &mut SessionData) -> Result<()> {
        let creds = ClientCredentials::load(&self.dir)?;

        debug!(account, "Refreshing access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("refresh_token", data.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("Failed to send token refresh request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Token refresh failed ({}): {}", status, error_text);
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;

        data.access_token = refreshed.access_token;
        data.expires_at = Utc::now() + Duration::seconds(refreshed.expires_in);
        // Google usually doesn't return a new refresh_token on refresh
        if let Some(refresh_token) = refreshed.refresh_token.filter(|t| !t.is_empty()) {
            data.refresh_token = refresh_token;
        }

        self.save(account, data)
    }

    async fn access_token(&self, account: &str, force_refresh: bool) -> Result<String> {
        let mut data = self.load(account)?;

        if force_refresh || data.is_expired() {
            self.refresh(account, &mut data).await?;
        }

        Ok(data.access_token)
    }
}

#[async_trait]
impl TokenSource for SessionTokenSource {
    async fn token(&self, account: &str) -> GoogleResult<String> {
        self.access_token(account, false)
            .await
            .map_err(|e| GoogleError::Auth(format!("{e:#}")))
    }

    async fn fresh_token(&self, account: &str) -> GoogleResult<String> {
        self.access_token(account, true)
            .await
            .map_err(|e| GoogleError::Auth(format!("{e:#}")))
    }
}
