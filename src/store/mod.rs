//! SQLite-backed persistence.
//!
//! Submodules hold one file per aggregate. All functions take the pool as
//! their first argument and translate row lookups that come up empty into
//! the domain's `NotFound` errors; constraint violations surface through
//! `From<sqlx::Error>`.

pub mod tasks;
pub mod users;

use sqlx::SqlitePool;

use crate::error::AppError;

/// Creates the schema on first start. Uuids are stored as 16-byte blobs,
/// timestamps as UTC text, enums by their wire spelling.
pub async fn init(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id            BLOB PRIMARY KEY,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tasks (
            id          BLOB PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT,
            status      TEXT NOT NULL DEFAULT 'PENDING',
            priority    TEXT NOT NULL DEFAULT 'MEDIUM',
            due_date    TEXT,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL,
            user_id     BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// A fresh in-memory database for tests.
///
/// Capped at a single connection that is never reclaimed: every pooled
/// connection to `sqlite::memory:` would otherwise open its own empty
/// database.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid connect options")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("failed to open in-memory database");
    init(&pool).await.expect("failed to create schema");
    pool
}
