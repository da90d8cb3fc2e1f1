//! # Pending-Action Queue
//!
//! FIFO queue of actions waiting to be delivered. Ids come from SQLite's
//! `AUTOINCREMENT`, so they grow monotonically and are never reused, and the
//! queue order is simply id order.

use crate::client::local_db::{parse_timestamp, LocalStore};
use crate::shared::action::PendingActionKind;
use crate::shared::error::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// One deferred action as stored in the queue
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub id: i64,
    pub kind: PendingActionKind,
    pub enqueued_at: DateTime<Utc>,
}

impl LocalStore {
    /// Append an action to the queue and return its id
    pub async fn enqueue_action(&self, kind: &PendingActionKind) -> Result<i64> {
        let payload = serde_json::to_string(&kind.payload()?)?;

        let result = sqlx::query(
            "INSERT INTO sync_queue (action_type, payload, enqueued_at) VALUES (?, ?, ?)",
        )
        .bind(kind.type_name())
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, action = kind.type_name(), "Queued action");
        Ok(id)
    }

    /// All queued actions in the order they were enqueued
    pub async fn list_pending_actions(&self) -> Result<Vec<PendingAction>> {
        let rows = sqlx::query(
            "SELECT id, action_type, payload, enqueued_at
             FROM sync_queue
             ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_pending_action).collect()
    }

    /// Delete a queued action; unknown ids are ignored
    pub async fn remove_pending_action(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM sync_queue WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Number of queued actions
    pub async fn pending_count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sync_queue")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

fn decode_pending_action(row: &SqliteRow) -> Result<PendingAction> {
    let action_type: String = row.try_get("action_type")?;
    let payload: String = row.try_get("payload")?;
    let enqueued_at: String = row.try_get("enqueued_at")?;

    // Unparseable payloads are carried as a raw string so the row stays visible
    let payload = serde_json::from_str(&payload).unwrap_or(serde_json::Value::String(payload));

    Ok(PendingAction {
        id: row.try_get("id")?,
        kind: PendingActionKind::from_parts(&action_type, payload),
        enqueued_at: parse_timestamp(&enqueued_at)?,
    })
}
