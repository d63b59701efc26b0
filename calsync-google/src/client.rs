//! Authenticated access to the Calendar API.

use std::sync::Arc;

use calsync_core::GoogleApiConfig;
use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::warn;
use url::Url;

use crate::error::{GoogleError, GoogleResult};
use crate::token::TokenSource;

/// One account's handle on the Calendar API.
///
/// Cheap to clone: the HTTP connection pool and the token source are shared.
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    base_url: Url,
    account: String,
    tokens: Arc<dyn TokenSource>,
    max_auth_attempts: u32,
}

impl GoogleClient {
    pub fn new(
        account: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
        config: &GoogleApiConfig,
    ) -> GoogleResult<Self> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| GoogleError::InvalidUrl(format!("{}: {}", config.api_base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(GoogleError::InvalidUrl(config.api_base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout()?)
            .build()?;

        Ok(GoogleClient {
            http,
            base_url,
            account: account.into(),
            tokens,
            max_auth_attempts: config.max_auth_attempts.max(1),
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Build an API URL from raw path segments. Each segment is
    /// percent-encoded, so calendar and event ids may contain `/`, `#` etc.
    pub fn url(&self, segments: &[&str]) -> GoogleResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GoogleError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn access_token(&self) -> GoogleResult<String> {
        self.tokens.token(&self.account).await
    }

    /// Send the request produced by `build` with `token` as bearer auth.
    ///
    /// On 401 the token is replaced with a fresh one and the identical
    /// request is sent again, at most `max_auth_attempts` sends in total.
    /// Any other non-2xx status becomes `GoogleError::Http`.
    pub(crate) async fn send_with_token<F>(
        &self,
        token: &mut String,
        build: F,
    ) -> GoogleResult<Response>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder,
    {
        let mut attempt = 1;

        loop {
            let response = build(&self.http).bearer_auth(token.as_str()).send().await?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                if attempt >= self.max_auth_attempts {
                    return Err(GoogleError::Unauthorized { attempts: attempt });
                }

                warn!(account = %self.account, attempt, "Access token rejected, refreshing");
                *token = self.tokens.fresh_token(&self.account).await?;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                let body = error_body(response.text().await);
                return Err(GoogleError::Http { status, body });
            }

            return Ok(response);
        }
    }
}

/// The body of an error response, or a note saying why it is missing.
fn error_body<E: std::fmt::Display>(read: Result<String, E>) -> String {
    match read {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Failed to read error response body");
            format!("<unreadable body: {}>", e)
        }
    }
}
