pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserResponse;

pub use extractors::CurrentUser;
pub use middleware::BearerAuth;
pub use password::{hash_password, verify_password};
pub use token::Claims;

/// Payload for `POST /api/auth/register`.
///
/// Fields default to empty strings so that a missing field and a blank one
/// fail validation with the same message.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Payload for `POST /api/auth/login`.
///
/// Only presence is validated here. Whether the pair matches an account is
/// decided by the handler, which answers the same 401 for an unknown email
/// and a wrong password.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,
}

/// Data payload returned by register and login: the account's public shape
/// plus a signed bearer token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}
