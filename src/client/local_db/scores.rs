//! Scores cache: exercise and mock-exam results recorded on this device.

use crate::client::local_db::{parse_timestamp, LocalStore};
use crate::shared::error::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// A result to be cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScore {
    pub subject_id: String,
    pub score: i64,
    pub total_questions: i64,
    /// Seconds spent on the attempt
    pub time_spent: i64,
}

/// A cached result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub id: i64,
    pub subject_id: String,
    pub score: i64,
    pub total_questions: i64,
    pub time_spent: i64,
    pub recorded_at: DateTime<Utc>,
}

impl ScoreEntry {
    /// Score as a whole-number percentage; zero when there were no questions
    pub fn percentage(&self) -> i64 {
        if self.total_questions <= 0 {
            return 0;
        }
        ((self.score as f64 / self.total_questions as f64) * 100.0).round() as i64
    }
}

impl LocalStore {
    /// Record a result and return its id
    pub async fn cache_score(&self, score: &NewScore) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO scores_cache (subject_id, score, total_questions, time_spent, recorded_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&score.subject_id)
        .bind(score.score)
        .bind(score.total_questions)
        .bind(score.time_spent)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Cached results, newest first, optionally for one subject
    pub async fn list_scores(&self, subject_id: Option<&str>) -> Result<Vec<ScoreEntry>> {
        let rows = match subject_id {
            Some(subject_id) => {
                sqlx::query(
                    "SELECT id, subject_id, score, total_questions, time_spent, recorded_at
                     FROM scores_cache
                     WHERE subject_id = ?
                     ORDER BY id DESC",
                )
                .bind(subject_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, subject_id, score, total_questions, time_spent, recorded_at
                     FROM scores_cache
                     ORDER BY id DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(decode_score).collect()
    }
}

fn decode_score(row: &SqliteRow) -> Result<ScoreEntry> {
    let recorded_at: String = row.try_get("recorded_at")?;
    Ok(ScoreEntry {
        id: row.try_get("id")?,
        subject_id: row.try_get("subject_id")?,
        score: row.try_get("score")?,
        total_questions: row.try_get("total_questions")?,
        time_spent: row.try_get("time_spent")?,
        recorded_at: parse_timestamp(&recorded_at)?,
    })
}
