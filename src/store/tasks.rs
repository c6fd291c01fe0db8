use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewTask, SortField, SortOrder, Task, TaskListQuery, TaskUpdate};
use crate::response::PageMeta;

pub async fn create(pool: &SqlitePool, owner: Uuid, input: NewTask) -> Result<Task, AppError> {
    let now = Utc::now();
    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (id, title, description, status, priority, due_date, created_at, updated_at, user_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(input.title)
    .bind(input.description)
    .bind(input.status)
    .bind(input.priority)
    .bind(input.due_date)
    .bind(now)
    .bind(now)
    .bind(owner)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

/// Lists the owner's tasks with filters, sorting and pagination.
///
/// Filters combine with AND. The sort column comes from the allow-list in
/// [`SortField`], never from raw input, so interpolating it into the query
/// is safe. The row query and the count query share the same WHERE clause;
/// `meta.total` counts all matching rows regardless of the page window.
pub async fn find_all(
    pool: &SqlitePool,
    owner: Uuid,
    query: &TaskListQuery,
) -> Result<(Vec<Task>, PageMeta), AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);
    // page and limit arrive unbounded from the query string
    let offset = (page - 1).saturating_mul(limit);

    let mut conditions = vec!["user_id = ?"];
    if query.status.is_some() {
        conditions.push("status = ?");
    }
    if query.priority.is_some() {
        conditions.push("priority = ?");
    }
    let pattern = query.search.as_ref().map(|term| format!("%{}%", term));
    if pattern.is_some() {
        conditions.push("(title LIKE ? OR description LIKE ?)");
    }
    let where_clause = conditions.join(" AND ");

    let sort_field = SortField::parse(query.sort_by.as_deref());
    let sort_order = SortOrder::parse(query.sort_order.as_deref());

    let rows_sql = format!(
        "SELECT * FROM tasks WHERE {} ORDER BY {} {} LIMIT ? OFFSET ?",
        where_clause,
        sort_field.column(),
        sort_order.sql()
    );
    let mut rows_query = sqlx::query_as::<_, Task>(&rows_sql).bind(owner);
    if let Some(status) = query.status {
        rows_query = rows_query.bind(status);
    }
    if let Some(priority) = query.priority {
        rows_query = rows_query.bind(priority);
    }
    if let Some(ref pattern) = pattern {
        rows_query = rows_query.bind(pattern.clone()).bind(pattern.clone());
    }
    let tasks = rows_query.bind(limit).bind(offset).fetch_all(pool).await?;

    let count_sql = format!("SELECT COUNT(*) FROM tasks WHERE {}", where_clause);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(owner);
    if let Some(status) = query.status {
        count_query = count_query.bind(status);
    }
    if let Some(priority) = query.priority {
        count_query = count_query.bind(priority);
    }
    if let Some(ref pattern) = pattern {
        count_query = count_query.bind(pattern.clone()).bind(pattern.clone());
    }
    let total = count_query.fetch_one(pool).await?;

    let meta = PageMeta {
        page,
        limit,
        total,
        total_pages: total.saturating_add(limit - 1) / limit,
    };

    Ok((tasks, meta))
}

/// Fetches one task scoped to its owner. A task owned by someone else is
/// indistinguishable from a task that does not exist.
pub async fn find_by_id(pool: &SqlitePool, owner: Uuid, id: Uuid) -> Result<Task, AppError> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Applies the fields present in `changes` and refreshes `updated_at`,
/// which also makes an all-absent update a plain timestamp touch.
///
/// A concurrent delete between the ownership check and the UPDATE makes
/// the second step match nothing; that surfaces as `NotFound`.
pub async fn update(
    pool: &SqlitePool,
    owner: Uuid,
    id: Uuid,
    changes: TaskUpdate,
) -> Result<Task, AppError> {
    find_by_id(pool, owner, id).await?;

    let mut sets: Vec<&str> = Vec::new();
    if changes.title.is_some() {
        sets.push("title = ?");
    }
    if changes.description.is_some() {
        sets.push("description = ?");
    }
    if changes.status.is_some() {
        sets.push("status = ?");
    }
    if changes.priority.is_some() {
        sets.push("priority = ?");
    }
    if changes.due_date.is_some() {
        sets.push("due_date = ?");
    }
    sets.push("updated_at = ?");

    let sql = format!(
        "UPDATE tasks SET {} WHERE id = ? AND user_id = ? RETURNING *",
        sets.join(", ")
    );

    let mut query = sqlx::query_as::<_, Task>(&sql);
    if let Some(title) = changes.title {
        query = query.bind(title);
    }
    if let Some(description) = changes.description {
        query = query.bind(description);
    }
    if let Some(status) = changes.status {
        query = query.bind(status);
    }
    if let Some(priority) = changes.priority {
        query = query.bind(priority);
    }
    if let Some(due_date) = changes.due_date {
        query = query.bind(due_date);
    }

    query
        .bind(Utc::now())
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Removes the task after the same ownership check as `find_by_id`.
/// Repeating the call after success answers `NotFound`.
pub async fn delete(pool: &SqlitePool, owner: Uuid, id: Uuid) -> Result<(), AppError> {
    find_by_id(pool, owner, id).await?;

    let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(())
}
