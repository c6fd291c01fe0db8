use actix_web::{post, web, Responder};
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::{hash_password, token, verify_password, AuthResponse, LoginRequest, RegisterRequest};
use crate::config::Config;
use crate::error::AppError;
use crate::response::ApiResponse;
use crate::store;

/// Registers a new account and signs it in immediately: the response
/// carries the fresh account alongside a usable token.
#[post("/register")]
pub async fn register(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    body: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let password_hash = hash_password(&body.password)?;
    let user = store::users::create(&pool, &body.name, &body.email, &password_hash).await?;
    let token = token::issue(&config.auth, user.id)?;

    Ok(ApiResponse::created(
        "User registered successfully",
        AuthResponse {
            user: user.into(),
            token,
        },
    ))
}

/// Exchanges email and password for a token. An unknown email and a wrong
/// password are deliberately indistinguishable in the response.
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    match store::users::find_by_email(&pool, &body.email).await? {
        Some(user) => {
            if verify_password(&body.password, &user.password_hash)? {
                let token = token::issue(&config.auth, user.id)?;
                Ok(ApiResponse::ok(
                    "Login successful",
                    AuthResponse {
                        user: user.into(),
                        token,
                    },
                ))
            } else {
                Err(AppError::Unauthorized("Invalid email or password".into()))
            }
        }
        None => Err(AppError::Unauthorized("Invalid email or password".into())),
    }
}
