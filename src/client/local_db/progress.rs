//! Progress cache: last known completion state per topic, one row per topic.

use crate::client::local_db::{parse_timestamp, LocalStore};
use crate::shared::error::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;

/// Cached progress for one topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEntry {
    pub topic_id: String,
    pub completed: bool,
    /// Accumulated study time in seconds, when known
    pub time_spent: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

/// Fields to merge into a progress entry; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressFields {
    pub completed: Option<bool>,
    pub time_spent: Option<i64>,
}

impl ProgressFields {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn time_spent(time_spent: i64) -> Self {
        Self {
            time_spent: Some(time_spent),
            ..Self::default()
        }
    }
}

impl LocalStore {
    /// Merge `fields` into the entry for `topic_id`, creating it if needed.
    ///
    /// Last write wins. A new entry without a `completed` value starts as
    /// not completed.
    pub async fn upsert_progress(&self, topic_id: &str, fields: &ProgressFields) -> Result<()> {
        sqlx::query(
            "INSERT INTO progress_cache (topic_id, completed, time_spent, updated_at)
             VALUES (?1, COALESCE(?2, 0), ?3, ?4)
             ON CONFLICT(topic_id) DO UPDATE SET
                completed = COALESCE(?2, progress_cache.completed),
                time_spent = COALESCE(?3, progress_cache.time_spent),
                updated_at = ?4",
        )
        .bind(topic_id)
        .bind(fields.completed)
        .bind(fields.time_spent)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Cached progress for `topic_id`, if any
    pub async fn get_progress(&self, topic_id: &str) -> Result<Option<ProgressEntry>> {
        let row = sqlx::query(
            "SELECT topic_id, completed, time_spent, updated_at
             FROM progress_cache
             WHERE topic_id = ?",
        )
        .bind(topic_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let updated_at: String = row.try_get("updated_at")?;
        Ok(Some(ProgressEntry {
            topic_id: row.try_get("topic_id")?,
            completed: row.try_get("completed")?,
            time_spent: row.try_get("time_spent")?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}
