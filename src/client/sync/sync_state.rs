//! # Sync State
//!
//! What the last drain pass did, and what the coordinator currently knows about
//! the queue. Read by status displays; never consulted for decisions.

use chrono::{DateTime, Utc};

/// Outcome of one drain pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Items a remote call was made for
    pub attempted: usize,
    /// Items delivered and removed from the queue
    pub delivered: usize,
    /// Ids of items left queued because their type is unknown
    pub skipped: Vec<i64>,
    /// Ids of items the server rejected and that were dropped
    pub dropped: Vec<i64>,
    /// Id of the item the pass stopped at, if it stopped early
    pub halted_at: Option<i64>,
    /// Why the pass stopped early
    pub error: Option<String>,
}

impl DrainReport {
    /// Whether the pass reached the end of its snapshot
    pub fn is_complete(&self) -> bool {
        self.halted_at.is_none() && self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    pub is_syncing: bool,
    /// End of the last pass that reached the end of its snapshot
    pub last_sync: Option<DateTime<Utc>>,
    /// Queue length after the last pass
    pub pending_actions: u64,
    pub last_report: Option<DrainReport>,
}
