//! The bearer-token seam.

use async_trait::async_trait;

use crate::error::GoogleResult;

/// Supplies bearer tokens for an account.
///
/// Implementations own any caching. `fresh_token` is called after the API
/// rejected a token with 401 and must not hand back the rejected one.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self, account: &str) -> GoogleResult<String>;

    async fn fresh_token(&self, account: &str) -> GoogleResult<String>;
}
