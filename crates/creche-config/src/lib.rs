//! # Creche Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetimes
//! - [`cors`]: allowed browser origins
//! - [`storage`]: where uploaded documents live and how they are served
//!
//! ```ignore
//! use creche_config::{CorsConfig, JwtConfig, StorageConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let storage_config = StorageConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod storage;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use storage::StorageConfig;

/// Reads `key` and parses it, falling back to `default` when unset or invalid.
pub(crate) fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
