use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// The authenticated account id, extracted from request extensions.
///
/// [`crate::auth::BearerAuth`] verifies the bearer token and stores this
/// value before the handler runs, so on wrapped routes extraction cannot
/// fail. The error arm only fires if a handler takes this extractor on a
/// route that was never wrapped, and answers 401 rather than exposing the
/// wiring mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>().copied() {
            Some(user) => ready(Ok(user)),
            None => {
                let err = AppError::Unauthorized(
                    "Authentication required. Please provide a valid token.".into(),
                );
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_rt::test]
    async fn test_extracts_user_inserted_by_middleware() {
        let req = test::TestRequest::default().to_http_request();
        let user_id = Uuid::new_v4();
        req.extensions_mut().insert(CurrentUser(user_id));

        let mut payload = Payload::None;
        let extracted = CurrentUser::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(extracted.0, user_id);
    }

    #[actix_rt::test]
    async fn test_missing_user_is_unauthorized() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let err = CurrentUser::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }
}
