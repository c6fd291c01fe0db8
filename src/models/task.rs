use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Lifecycle state of a task. Stored as TEXT in the database using the
/// wire spelling (`PENDING`, `IN_PROGRESS`, `COMPLETED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[sqlx(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "IN_PROGRESS")]
    InProgress,
    #[sqlx(rename = "COMPLETED")]
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// Priority of a task. Stored as TEXT (`LOW`, `MEDIUM`, `HIGH`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    #[sqlx(rename = "LOW")]
    Low,
    #[sqlx(rename = "MEDIUM")]
    Medium,
    #[sqlx(rename = "HIGH")]
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// A task row, serialized with camelCase keys for API responses.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
}

/// Payload for `POST /api/tasks`.
///
/// A missing title deserializes to an empty string so that absent and
/// blank titles fail validation with the same message.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default)]
    #[validate(custom = "validate_title")]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

/// Payload for `PUT /api/tasks/{id}`. Every field is optional; fields
/// not present in the JSON body are left untouched.
///
/// `description` and `due_date` distinguish "absent" from "null": an
/// explicit null clears the column. `title` cannot be cleared, so a null
/// title is treated as absent.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[validate(custom = "validate_title")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Query string accepted by `GET /api/tasks`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Columns a listing may be ordered by. Anything not in this allow-list
/// silently falls back to `created_at`, which is also the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Status,
    Priority,
    DueDate,
}

impl SortField {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("createdAt") => Self::CreatedAt,
            Some("updatedAt") => Self::UpdatedAt,
            Some("title") => Self::Title,
            Some("status") => Self::Status,
            Some("priority") => Self::Priority,
            Some("dueDate") => Self::DueDate,
            _ => Self::CreatedAt,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::DueDate => "due_date",
        }
    }
}

/// Sort direction. Only the exact string `asc` selects ascending order;
/// everything else, including the default, is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut err = ValidationError::new("title");
        err.message = Some("Title is required".into());
        return Err(err);
    }
    Ok(())
}

/// Maps an absent field to `None` and an explicit `null` to `Some(None)`,
/// so partial updates can tell "leave unchanged" apart from "clear".
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
