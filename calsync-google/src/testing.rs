//! Test doubles shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use calsync_core::GoogleApiConfig;
use wiremock::MockServer;

use crate::client::GoogleClient;
use crate::error::GoogleResult;
use crate::token::TokenSource;

/// Hands out `initial-token` first, then `fresh-token-1`, `fresh-token-2`...
#[derive(Default)]
pub(crate) struct FakeTokens {
    token_calls: AtomicUsize,
    fresh_calls: AtomicUsize,
}

impl FakeTokens {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(FakeTokens::default())
    }

    pub(crate) fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fresh_calls(&self) -> usize {
        self.fresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for FakeTokens {
    async fn token(&self, _account: &str) -> GoogleResult<String> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        Ok("initial-token".to_string())
    }

    async fn fresh_token(&self, _account: &str) -> GoogleResult<String> {
        let n = self.fresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("fresh-token-{}", n))
    }
}

pub(crate) fn client_for(server: &MockServer, tokens: Arc<FakeTokens>) -> GoogleClient {
    let config = GoogleApiConfig {
        api_base_url: server.uri(),
        request_timeout: "5s".to_string(),
        ..GoogleApiConfig::default()
    };

    GoogleClient::new("me@example.com", tokens, &config).unwrap()
}
