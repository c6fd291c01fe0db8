use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::User;

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

/// Inserts a new account. Answers `Conflict` when the email is taken; the
/// pre-insert lookup gives the friendly error, the unique index on `email`
/// stays the authoritative guard for the race between the two.
pub async fn create(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    let taken = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Exact-match lookup; the caller decides what an unknown email means.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Applies the provided profile fields and refreshes `updated_at`. The
/// caller has already rejected the no-op case and hashed any new password.
pub async fn update_profile(
    pool: &SqlitePool,
    id: Uuid,
    name: Option<&str>,
    password_hash: Option<&str>,
) -> Result<User, AppError> {
    let mut sets: Vec<&str> = Vec::new();
    if name.is_some() {
        sets.push("name = ?");
    }
    if password_hash.is_some() {
        sets.push("password_hash = ?");
    }
    sets.push("updated_at = ?");

    let sql = format!(
        "UPDATE users SET {} WHERE id = ? RETURNING {USER_COLUMNS}",
        sets.join(", ")
    );

    let mut query = sqlx::query_as::<_, User>(&sql);
    if let Some(name) = name {
        query = query.bind(name);
    }
    if let Some(hash) = password_hash {
        query = query.bind(hash);
    }

    query
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}
