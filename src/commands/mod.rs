pub mod auth;
pub mod calendars;
pub mod events;
pub mod push;
pub mod sync;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use calsync_core::CalsyncConfig;
use calsync_google::{GoogleClient, SessionTokenSource};
use serde::Serialize;

/// Configuration and credentials shared by every command.
pub struct Context {
    pub config: CalsyncConfig,
    pub tokens: Arc<SessionTokenSource>,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = CalsyncConfig::load().context("Failed to load configuration")?;
        let tokens = Arc::new(SessionTokenSource::new(
            CalsyncConfig::base_dir()?,
            config.google.token_url.clone(),
        ));

        Ok(Context { config, tokens })
    }

    pub fn client(&self, account: &str) -> Result<GoogleClient> {
        GoogleClient::new(account, self.tokens.clone(), &self.config.google)
            .context("Failed to create Google client")
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
