//! # Creche Auth
//!
//! JWT claims and token utilities for the Creche API.
//!
//! - [`claims`]: access ([`Claims`]) and refresh ([`RefreshTokenClaims`]) claims
//! - [`jwt`]: token creation and verification

pub mod claims;
pub mod jwt;

pub use claims::{Claims, RefreshTokenClaims};
pub use jwt::{create_access_token, create_refresh_token, verify_refresh_token, verify_token};
