use chrono::Duration;
use std::env;

/// Process-wide configuration, read from the environment exactly once at
/// startup and passed explicitly to the components that need it. Nothing
/// outside this module reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub auth: AuthConfig,
}

/// The slice of configuration the token issuer/verifier and the
/// authentication middleware depend on.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric secret used to sign and verify bearer tokens.
    pub jwt_secret: String,
    /// How long an issued token stays valid.
    pub token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://taskvault.db".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "default-secret-change-me".to_string()),
                token_ttl: Duration::days(
                    env::var("JWT_EXPIRY_DAYS")
                        .unwrap_or_else(|_| "7".to_string())
                        .parse()
                        .expect("JWT_EXPIRY_DAYS must be a number"),
                ),
            },
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
