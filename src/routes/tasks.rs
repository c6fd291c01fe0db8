use actix_web::{delete, get, post, put, web, Responder};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::{NewTask, TaskListQuery, TaskUpdate};
use crate::response::ApiResponse;
use crate::store;

/// Lists the caller's tasks.
///
/// Query parameters: `page` and `limit` (clamped to at least 1, defaulting
/// to 1 and 10), `status` and `priority` (exact matches), `search`
/// (case-insensitive substring over title and description), `sortBy`
/// (`createdAt`, `updatedAt`, `title`, `status`, `priority`, `dueDate`)
/// and `sortOrder` (`asc` or `desc`). Unknown `sortBy` values fall back to
/// newest-first.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    query: web::Query<TaskListQuery>,
) -> Result<impl Responder, AppError> {
    let (tasks, meta) = store::tasks::find_all(&pool, user.0, &query).await?;

    Ok(ApiResponse::ok_with_meta(
        "Tasks retrieved successfully",
        tasks,
        meta,
    ))
}

/// Creates a task owned by the caller.
#[post("")]
pub async fn create_task(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    body: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let task = store::tasks::create(&pool, user.0, body.into_inner()).await?;

    Ok(ApiResponse::created("Task created successfully", task))
}

/// Fetches one of the caller's tasks by id.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = store::tasks::find_by_id(&pool, user.0, task_id.into_inner()).await?;

    Ok(ApiResponse::ok("Task retrieved successfully", task))
}

/// Partially updates one of the caller's tasks.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    task_id: web::Path<Uuid>,
    body: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let task = store::tasks::update(&pool, user.0, task_id.into_inner(), body.into_inner()).await?;

    Ok(ApiResponse::ok("Task updated successfully", task))
}

/// Deletes one of the caller's tasks.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    store::tasks::delete(&pool, user.0, task_id.into_inner()).await?;

    Ok(ApiResponse::ok_empty("Task deleted successfully"))
}
