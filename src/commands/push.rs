use std::path::Path;

use anyhow::{Context as _, Result};
use calsync_core::Event;
use calsync_google::RemoteMutator;

use super::Context;

fn read_event(path: &Path) -> Result<Event> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event from {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse event from {}", path.display()))
}

pub async fn create(ctx: &Context, account: &str, calendar: &str, event_file: &Path) -> Result<()> {
    let event = read_event(event_file)?;

    let remote_id = RemoteMutator::new(ctx.client(account)?)
        .create(calendar, &event)
        .await
        .with_context(|| format!("Failed to create event: {}", event))?;

    println!("{}", remote_id);
    Ok(())
}

pub async fn update(ctx: &Context, account: &str, calendar: &str, event_file: &Path) -> Result<()> {
    let event = read_event(event_file)?;

    RemoteMutator::new(ctx.client(account)?)
        .update(calendar, &event)
        .await
        .with_context(|| format!("Failed to update event: {}", event))?;

    Ok(())
}

pub async fn delete(ctx: &Context, account: &str, calendar: &str, event_uid: &str) -> Result<()> {
    RemoteMutator::new(ctx.client(account)?)
        .delete(calendar, event_uid)
        .await
        .with_context(|| format!("Failed to delete event: {}", event_uid))?;

    Ok(())
}
