//! Cursor-following list fetches.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::client::GoogleClient;
use crate::error::{GoogleError, GoogleResult};

/// One page of a Calendar API list response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page {
    #[serde(default)]
    items: Vec<Value>,
    next_page_token: Option<String>,
}

/// Fetches every item of a paginated list resource.
pub struct PagedFetcher<'a> {
    client: &'a GoogleClient,
}

impl<'a> PagedFetcher<'a> {
    pub fn new(client: &'a GoogleClient) -> Self {
        PagedFetcher { client }
    }

    /// GET `url` page by page until the remote stops returning a
    /// `nextPageToken`, and return all `items` in the order received.
    ///
    /// `showDeleted=true` is always sent. A 401 refreshes the token and
    /// repeats the same page; other failures abort the whole fetch, as does
    /// a `nextPageToken` equal to the one just requested.
    pub async fn fetch_all(&self, url: &Url, params: &[(&str, String)]) -> GoogleResult<Vec<Value>> {
        let mut token = self.client.access_token().await?;
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_index = 0usize;

        loop {
            let mut query: Vec<(&str, &str)> = params
                .iter()
                .filter(|(key, _)| *key != "showDeleted" && *key != "pageToken")
                .map(|(key, value)| (*key, value.as_str()))
                .collect();
            query.push(("showDeleted", "true"));
            if let Some(ref cursor) = page_token {
                query.push(("pageToken", cursor.as_str()));
            }

            let response = self
                .client
                .send_with_token(&mut token, |http| http.get(url.clone()).query(&query))
                .await?;

            let body = response.text().await?;
            let page: Page = serde_json::from_str(&body)?;

            debug!(
                url = %url,
                page = page_index,
                items = page.items.len(),
                "Fetched page"
            );

            items.extend(page.items);
            page_index += 1;

            match page.next_page_token {
                Some(next) if page_token.as_deref() == Some(next.as_str()) => {
                    return Err(GoogleError::RepeatedPageToken(next));
                }
                Some(next) => page_token = Some(next),
                None => return Ok(items),
            }
        }
    }
}
