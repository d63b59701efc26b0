//! Colored stderr summaries for sync results.

use calsync_core::{Calendar, Event, SyncBatch};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Calendar {
    fn render(&self) -> String {
        if self.read_only {
            format!("📅 {} {}", self.name, "(read-only)".dimmed())
        } else {
            format!("📅 {}", self.name)
        }
    }
}

impl Render for SyncBatch<Event> {
    fn render(&self) -> String {
        if self.is_empty() {
            return format!("   {}", "No changes".dimmed());
        }

        let mut parts = Vec::new();
        if !self.upserts.is_empty() {
            parts.push(format!("{} changed", self.upserts.len()).green().to_string());
        }
        if !self.deleted_uids.is_empty() {
            parts.push(format!("{} deleted", self.deleted_uids.len()).red().to_string());
        }

        format!("   {}", parts.join(", "))
    }
}
