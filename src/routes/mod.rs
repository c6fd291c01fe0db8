pub mod auth;
pub mod health;
pub mod profile;
pub mod tasks;

use actix_web::{web, HttpResponse};

use crate::auth::BearerAuth;
use crate::config::AuthConfig;
use crate::error::AppError;

/// Registers everything under `/api`.
///
/// Register and login stay public; the task and profile scopes are wrapped
/// in [`BearerAuth`]. Extractor failures are rewritten here so malformed
/// bodies and query strings answer the standard failure envelope instead of
/// actix's plain-text default.
pub fn configure(auth: AuthConfig) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .service(
                web::scope("/auth")
                    .service(auth::register)
                    .service(auth::login),
            )
            .service(
                web::scope("/tasks")
                    .wrap(BearerAuth::new(auth.clone()))
                    .service(tasks::list_tasks)
                    .service(tasks::create_task)
                    .service(tasks::get_task)
                    .service(tasks::update_task)
                    .service(tasks::delete_task),
            )
            .service(
                web::scope("/profile")
                    .wrap(BearerAuth::new(auth))
                    .service(profile::get_profile)
                    .service(profile::update_profile),
            );
    }
}

/// Catch-all for unmatched paths.
pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("Route not found".into()))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

/// A path id that does not parse as a uuid can never match a record, so it
/// answers the same 404 as a well-formed unknown id.
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::NotFound("Task not found".into()).into())
}
