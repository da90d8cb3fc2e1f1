//! # Local Store
//!
//! Durable local storage for offline-first operation, backed by SQLite.
//! The store is split into three independently addressable partitions:
//!
//! - **Pending-action queue** (`sync_queue`): writes waiting for the server
//! - **Progress cache** (`progress_cache`): last known completion state per topic
//! - **Scores cache** (`scores_cache`): locally recorded exercise results
//!
//! ## Key Components
//!
//! - `LocalStore`: connection pool and schema management
//! - `schema.rs`: partition names, schema version and migrations
//! - `queue.rs`: pending-action queue operations
//! - `progress.rs`: progress cache operations
//! - `scores.rs`: scores cache operations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use studyhub::client::local_db::LocalStore;
//! use studyhub::shared::PendingActionKind;
//!
//! # async fn example() -> studyhub::shared::Result<()> {
//! let store = LocalStore::initialize("/tmp/studyhub/offline.db").await?;
//!
//! let id = store.enqueue_action(&PendingActionKind::topic_complete("t-1")).await?;
//! for action in store.list_pending_actions().await? {
//!     // deliver...
//!     store.remove_pending_action(action.id).await?;
//! }
//! # let _ = id;
//! # Ok(())
//! # }
//! ```

pub mod progress;
pub mod queue;
pub mod schema;
pub mod scores;

pub use progress::{ProgressEntry, ProgressFields};
pub use queue::PendingAction;
pub use scores::{NewScore, ScoreEntry};

use crate::shared::error::{Result, SyncError};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::Path;

/// Local database connection manager
///
/// Cheap to clone; clones share the same pool.
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    /// Open or create the local store at `path`
    ///
    /// Creates the file, its parent directory and any missing partition.
    /// Opening the same path again is safe and keeps existing data. Any failure
    /// here is reported as `StorageUnavailable`.
    pub async fn initialize(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SyncError::storage_unavailable(format!(
                    "cannot create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| {
                SyncError::storage_unavailable(format!("cannot open {}: {}", path.display(), e))
            })?;

        let store = Self { pool };
        store.run_migrations().await.map_err(|e| {
            SyncError::storage_unavailable(format!("cannot prepare {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "Local store ready");
        Ok(store)
    }

    /// Run database migrations
    ///
    /// Applies every migration newer than the recorded schema version, each in
    /// its own transaction.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        let current = self.schema_version().await?;
        if !schema::needs_migration(current) {
            return Ok(());
        }

        for migration in schema::pending_migrations(current) {
            let mut tx = self.pool.begin().await?;
            for statement in migration.statements.iter().copied() {
                sqlx::query(statement).execute(&mut *tx).await?;
            }
            sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)")
                .bind(migration.version)
                .bind(Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            tracing::info!(version = migration.version, "Applied local schema migration");
        }

        Ok(())
    }

    /// The applied schema-version marker
    pub async fn schema_version(&self) -> Result<i64> {
        let (version,): (i64,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await?;
        Ok(version)
    }

    /// Get connection pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for in-flight operations
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Parse a stored RFC 3339 timestamp
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| SyncError::Storage(sqlx::Error::Decode(Box::new(e))))
}
