use std::env;

use crate::env_parse;

/// Access tokens live one day, refresh tokens a week.
pub const DEFAULT_ACCESS_EXPIRY_SECS: i64 = 24 * 60 * 60;
pub const DEFAULT_REFRESH_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-creche-dev-secret".to_string()),
            access_token_expiry: env_parse("JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_EXPIRY_SECS),
            refresh_token_expiry: env_parse("JWT_REFRESH_EXPIRY", DEFAULT_REFRESH_EXPIRY_SECS),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-creche-dev-secret".to_string(),
            access_token_expiry: DEFAULT_ACCESS_EXPIRY_SECS,
            refresh_token_expiry: DEFAULT_REFRESH_EXPIRY_SECS,
        }
    }
}
