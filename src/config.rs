// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Questions drawn when the client does not ask for a specific amount.
pub const DEFAULT_QUIZ_LIMIT: i64 = 20;
pub const MIN_QUIZ_LIMIT: i64 = 1;
pub const MAX_QUIZ_LIMIT: i64 = 200;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Lifetime in seconds of tokens minted with `sign_jwt`.
    /// Kept for token-minting tools; the server itself only verifies tokens.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
        }
    }
}
