use anyhow::{Context as _, Result};
use calsync_google::CalendarListSync;

use super::{Context, print_json};

pub async fn run(ctx: &Context, account: &str) -> Result<()> {
    let batch = CalendarListSync::new(ctx.client(account)?)
        .sync()
        .await
        .context("Failed to sync calendar list")?;

    print_json(&batch)
}
