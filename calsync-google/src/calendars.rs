//! Calendar-list sync.

use calsync_core::{Calendar, SyncBatch};
use serde_json::Value;
use tracing::debug;

use crate::client::GoogleClient;
use crate::convert::{FromGoogle, item_id};
use crate::error::GoogleResult;
use crate::fetch::PagedFetcher;

const CALENDAR_LIST_PATH: [&str; 3] = ["users", "me", "calendarList"];

/// Enumerates the account's calendars.
pub struct CalendarListSync {
    client: GoogleClient,
}

impl CalendarListSync {
    pub fn new(client: GoogleClient) -> Self {
        CalendarListSync { client }
    }

    pub async fn sync(&self) -> GoogleResult<SyncBatch<Calendar>> {
        let url = self.client.url(&CALENDAR_LIST_PATH)?;
        let items = PagedFetcher::new(&self.client).fetch_all(&url, &[]).await?;

        let batch = classify_calendars(items)?;
        debug!(
            account = %self.client.account(),
            deleted = batch.deleted_uids.len(),
            upserts = batch.upserts.len(),
            "Calendar list synced"
        );

        Ok(batch)
    }
}

fn classify_calendars(items: Vec<Value>) -> GoogleResult<SyncBatch<Calendar>> {
    let mut batch = SyncBatch::default();

    for item in items {
        if item.get("deleted").and_then(Value::as_bool).unwrap_or(false) {
            batch.deleted_uids.push(item_id(&item)?);
        } else {
            batch.upserts.push(Calendar::from_google(item)?);
        }
    }

    Ok(batch)
}
