//!
//! # Application Errors
//!
//! This module defines `AppError`, the single error type used throughout the
//! application. Every fallible operation returns `Result<_, AppError>`, and
//! the route layer maps each error kind onto an HTTP status code and the
//! `{"success": false, "message": ...}` response envelope.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers and
//! middleware can surface errors with `?` and Actix renders the envelope.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// All error kinds the application can surface to a caller.
///
/// Each variant carries a human-readable message. `Internal` is the only kind
/// whose message is never sent to the client; it is logged server-side and
/// replaced with a generic message.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input, or failed domain validation (HTTP 400).
    InvalidInput(String),
    /// Missing, malformed, invalid or expired credentials (HTTP 401).
    Unauthorized(String),
    /// The requested record does not exist for this caller (HTTP 404).
    NotFound(String),
    /// The request conflicts with existing state, e.g. a duplicate email
    /// on registration (HTTP 409).
    Conflict(String),
    /// Anything unexpected: datastore failure, hashing failure (HTTP 500).
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to the client. Internal detail stays on the server.
    fn client_message(&self) -> &str {
        match self {
            AppError::InvalidInput(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg,
            AppError::Internal(_) => "Internal server error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` values into the failure response envelope.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            log::error!("internal error: {}", detail);
        }
        HttpResponse::build(self.status()).json(json!({
            "success": false,
            "message": self.client_message(),
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Store functions use `fetch_optional` and raise their own specific
/// `NotFound`, so `RowNotFound` here is only a backstop. A unique-constraint
/// violation maps to `Conflict`: the sole application-level unique index is
/// `users.email`, and the constraint is the authoritative guard behind the
/// friendlier pre-insert check.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Email already registered".into())
            }
            _ => AppError::Internal(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::InvalidInput`,
/// carrying the declared per-field messages rather than the debug formatting.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut messages: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|field| field.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect();
        messages.sort();
        messages.dedup();
        let message = if messages.is_empty() {
            "Invalid input".to_string()
        } else {
            messages.join(", ")
        };
        AppError::InvalidInput(message)
    }
}
