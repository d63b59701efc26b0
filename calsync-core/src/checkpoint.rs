//! Per-calendar sync checkpoints.
//!
//! A checkpoint is the instant a successful sync pass began. The next pass
//! asks the remote only for changes made since then.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{CalsyncError, CalsyncResult};

type Checkpoints = BTreeMap<String, BTreeMap<String, DateTime<Utc>>>;

/// File-backed map of `account -> calendar uid -> last synced at`.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
    checkpoints: Checkpoints,
}

impl CheckpointStore {
    /// Load checkpoints from `path`. A missing file is an empty store.
    pub fn load(path: &Path) -> CalsyncResult<Self> {
        let checkpoints = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents).map_err(|e| {
                CalsyncError::Checkpoint(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            Checkpoints::new()
        };

        Ok(CheckpointStore {
            path: path.to_path_buf(),
            checkpoints,
        })
    }

    pub fn get(&self, account: &str, calendar_uid: &str) -> Option<DateTime<Utc>> {
        self.checkpoints
            .get(account)
            .and_then(|calendars| calendars.get(calendar_uid))
            .copied()
    }

    pub fn set(&mut self, account: &str, calendar_uid: &str, at: DateTime<Utc>) {
        self.checkpoints
            .entry(account.to_string())
            .or_default()
            .insert(calendar_uid.to_string(), at);
    }

    pub fn remove(&mut self, account: &str, calendar_uid: &str) -> Option<DateTime<Utc>> {
        let calendars = self.checkpoints.get_mut(account)?;
        let removed = calendars.remove(calendar_uid);

        if calendars.is_empty() {
            self.checkpoints.remove(account);
        }

        removed
    }

    pub fn save(&self) -> CalsyncResult<()> {
        let contents = toml::to_string_pretty(&self.checkpoints)
            .map_err(|e| CalsyncError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.path, contents)?;

        Ok(())
    }
}
