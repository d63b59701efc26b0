use std::collections::BTreeMap;

use anyhow::{Context as _, Result};
use calsync_core::{Calendar, CheckpointStore, Event, SyncBatch};
use calsync_google::{CalendarListSync, EventListSync};
use chrono::Utc;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::info;

use super::{Context, print_json};
use crate::render::Render;

/// Everything one `sync` pass learned, keyed by calendar uid.
#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub calendars: SyncBatch<Calendar>,
    pub events: BTreeMap<String, SyncBatch<Event>>,
}

pub async fn run(ctx: &Context, account: &str, full: bool) -> Result<()> {
    let report = sync_account(ctx, account, full).await?;

    let changed: usize = report.events.values().map(SyncBatch::len).sum();
    eprintln!(
        "\n{} {} calendars, {} event changes",
        "Synced".green(),
        report.calendars.upserts.len(),
        changed
    );

    print_json(&report)
}

/// One pass over every calendar of `account`. Checkpoints are persisted
/// only when the whole pass succeeds.
async fn sync_account(ctx: &Context, account: &str, full: bool) -> Result<SyncReport> {
    let client = ctx.client(account)?;
    let mut checkpoints = CheckpointStore::load(&ctx.config.checkpoint_path()?)?;

    let calendars = CalendarListSync::new(client.clone())
        .sync()
        .await
        .context("Failed to sync calendar list")?;

    for uid in &calendars.deleted_uids {
        if checkpoints.remove(account, uid).is_some() {
            info!(calendar = %uid, "Calendar deleted remotely, dropping checkpoint");
        }
    }

    let event_sync = EventListSync::new(client);
    let mut events = BTreeMap::new();

    for calendar in &calendars.upserts {
        let since = if full {
            None
        } else {
            checkpoints.get(account, &calendar.uid)
        };

        // Changes made while this pass runs must show up in the next one
        let started_at = Utc::now();
        let batch = event_sync
            .sync(&calendar.uid, since)
            .await
            .with_context(|| format!("Failed to sync events for {}", calendar.name))?;

        eprintln!("{}", calendar.render());
        eprintln!("{}", batch.render());

        checkpoints.set(account, &calendar.uid, started_at);
        events.insert(calendar.uid.clone(), batch);
    }

    // Only a fully successful pass advances the checkpoints
    checkpoints.save()?;

    Ok(SyncReport { calendars, events })
}
