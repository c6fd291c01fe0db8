use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AppError;

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The account this token authenticates.
    pub sub: Uuid,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Signs a token for `user_id`, valid for the configured TTL.
pub fn issue(config: &AuthConfig, user_id: Uuid) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + config.token_ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Verifies signature and expiry, returning the decoded claims.
///
/// Every failure mode collapses into the same `Unauthorized` answer; the
/// caller cannot tell a forged token from an expired one.
pub fn verify(config: &AuthConfig, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token.".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_auth_config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            token_ttl: Duration::days(7),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let config = test_auth_config("round-trip-secret");
        let user_id = Uuid::new_v4();

        let token = issue(&config, user_id).unwrap();
        let claims = verify(&config, &token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = test_auth_config("expiry-secret");

        // well past the default 60s decode leeway
        let issued = Utc::now() - Duration::hours(3);
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: issued.timestamp(),
            exp: (issued + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        match verify(&config, &token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid or expired token."),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue(&test_auth_config("secret-a"), Uuid::new_v4()).unwrap();

        match verify(&test_auth_config("secret-b"), &token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid or expired token."),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let config = test_auth_config("garbage-secret");
        assert!(verify(&config, "not-a-jwt").is_err());
        assert!(verify(&config, "").is_err());
    }
}
