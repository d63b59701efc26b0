//! Calendars as reported by a remote calendar list.

use serde::{Deserialize, Serialize};

/// A remote calendar, rebuilt on every calendar-list sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    /// Remote identifier (stable across syncs)
    pub uid: String,
    pub name: String,
    /// True when the account may only read this calendar
    pub read_only: bool,
    pub description: Option<String>,
}
