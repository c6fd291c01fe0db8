use actix_web::{get, put, web, Responder};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::{Validate, ValidationError};

use crate::auth::{hash_password, verify_password, CurrentUser};
use crate::error::AppError;
use crate::models::UserResponse;
use crate::response::ApiResponse;
use crate::store;

/// Payload for `PUT /profile`. Changing the password requires proving
/// knowledge of the current one; empty strings count as absent fields,
/// so the length rules only apply to values that are actually there.
#[derive(Debug, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(custom = "validate_new_name")]
    pub name: Option<String>,
    #[validate(custom = "validate_new_password")]
    pub password: Option<String>,
    pub current_password: Option<String>,
}

fn validate_new_name(name: &str) -> Result<(), ValidationError> {
    if !name.is_empty() && name.chars().count() < 2 {
        let mut err = ValidationError::new("name");
        err.message = Some("Name must be at least 2 characters".into());
        return Err(err);
    }
    Ok(())
}

fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if !password.is_empty() && password.chars().count() < 6 {
        let mut err = ValidationError::new("password");
        err.message = Some("Password must be at least 6 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Returns the caller's own profile.
#[get("")]
pub async fn get_profile(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let user = store::users::find_by_id(&pool, user.0).await?;

    Ok(ApiResponse::ok(
        "Profile retrieved successfully",
        UserResponse::from(user),
    ))
}

/// Updates the caller's name and/or password.
#[put("")]
pub async fn update_profile(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    body: web::Json<ProfileUpdate>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let body = body.into_inner();
    let name = body.name.as_deref().filter(|s| !s.is_empty());
    let password = body.password.as_deref().filter(|s| !s.is_empty());

    let password_hash = match password {
        Some(password) => {
            let current = body
                .current_password
                .as_deref()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    AppError::InvalidInput("Current password is required".to_string())
                })?;

            let record = store::users::find_by_id(&pool, user.0).await?;
            if !verify_password(current, &record.password_hash)? {
                return Err(AppError::InvalidInput(
                    "Current password is incorrect".to_string(),
                ));
            }

            Some(hash_password(password)?)
        }
        None => None,
    };

    if name.is_none() && password_hash.is_none() {
        return Err(AppError::InvalidInput("No fields to update".to_string()));
    }

    let updated =
        store::users::update_profile(&pool, user.0, name, password_hash.as_deref()).await?;

    Ok(ApiResponse::ok(
        "Profile updated successfully",
        UserResponse::from(updated),
    ))
}
