use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::CurrentUser;
use crate::auth::token;
use crate::config::AuthConfig;
use crate::error::AppError;

/// Guards a scope behind bearer-token authentication.
///
/// Wrapped routes only run for requests carrying a valid
/// `Authorization: Bearer <token>` header; the verified account id is made
/// available to handlers through the [`CurrentUser`] extractor. Public
/// scopes (health, register, login) are simply not wrapped.
pub struct BearerAuth {
    auth: AuthConfig,
}

impl BearerAuth {
    pub fn new(auth: AuthConfig) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = BearerAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthService {
            service,
            auth: self.auth.clone(),
        }))
    }
}

pub struct BearerAuthService<S> {
    service: S,
    auth: AuthConfig,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty());

        let token = match bearer {
            Some(token) => token,
            None => {
                let err = AppError::Unauthorized(
                    "Authentication required. Please provide a valid token.".into(),
                );
                return Box::pin(async move { Err(err.into()) });
            }
        };

        match token::verify(&self.auth, token) {
            Ok(claims) => {
                req.extensions_mut().insert(CurrentUser(claims.sub));
                Box::pin(self.service.call(req))
            }
            Err(err) => Box::pin(async move { Err(err.into()) }),
        }
    }
}
