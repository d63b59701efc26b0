use anyhow::{Context as _, Result};
use calsync_google::EventListSync;
use chrono::{DateTime, Utc};

use super::{Context, print_json};

pub async fn run(
    ctx: &Context,
    account: &str,
    calendar: &str,
    since: Option<DateTime<Utc>>,
) -> Result<()> {
    let batch = EventListSync::new(ctx.client(account)?)
        .sync(calendar, since)
        .await
        .with_context(|| format!("Failed to sync events for {}", calendar))?;

    print_json(&batch)
}
