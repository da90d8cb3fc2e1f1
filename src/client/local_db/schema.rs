//! Database Schema Definitions
//!
//! Partition names, the schema-version marker and the additive migrations that
//! create them. A migration only ever adds tables or indexes so an upgrade keeps
//! whatever was already queued or cached.

/// Pending-action queue partition
pub const QUEUE_PARTITION: &str = "sync_queue";

/// Progress cache partition
pub const PROGRESS_PARTITION: &str = "progress_cache";

/// Scores cache partition
pub const SCORES_PARTITION: &str = "scores_cache";

/// Current database schema version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// One schema version and the statements that produce it
#[derive(Debug)]
pub struct Migration {
    pub version: i64,
    pub statements: &'static [&'static str],
}

/// All migrations, oldest first
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    statements: &[
        "CREATE TABLE IF NOT EXISTS sync_queue (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            action_type TEXT NOT NULL,
            payload TEXT NOT NULL,
            enqueued_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS progress_cache (
            topic_id TEXT PRIMARY KEY NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            time_spent INTEGER,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS scores_cache (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id TEXT NOT NULL,
            score INTEGER NOT NULL,
            total_questions INTEGER NOT NULL,
            time_spent INTEGER NOT NULL DEFAULT 0,
            recorded_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_scores_cache_subject ON scores_cache (subject_id)",
    ],
}];

/// Check if database needs migration
pub fn needs_migration(current_version: i64) -> bool {
    current_version < CURRENT_SCHEMA_VERSION
}

/// Get pending migrations
pub fn pending_migrations(current_version: i64) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > current_version)
}
