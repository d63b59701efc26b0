//! The result shape shared by every sync pass.

use serde::{Deserialize, Serialize};

/// Changes reported by one sync pass: identifiers the remote marked as
/// deleted, and fresh records to create or update locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncBatch<T> {
    pub deleted_uids: Vec<String>,
    pub upserts: Vec<T>,
}

impl<T> SyncBatch<T> {
    pub fn is_empty(&self) -> bool {
        self.deleted_uids.is_empty() && self.upserts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deleted_uids.len() + self.upserts.len()
    }
}

impl<T> Default for SyncBatch<T> {
    fn default() -> Self {
        SyncBatch {
            deleted_uids: Vec::new(),
            upserts: Vec::new(),
        }
    }
}
