//! JWT claim structures.
//!
//! Access and refresh tokens carry disjoint required fields, so a token of
//! one kind never decodes as the other.

use creche_core::AppError;
use creche_models::UserType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub username: String,
    /// Profile type at the time the token was issued
    pub user_type: UserType,
    pub is_staff: bool,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    /// Staff accounts count as admins whatever their profile type.
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin || self.is_staff
    }
}

/// Claims embedded in refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// User ID (subject claim)
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    /// Unique token identifier
    pub jti: String,
}

impl RefreshTokenClaims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(user_type: UserType, is_staff: bool) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            username: "someone".to_string(),
            user_type,
            is_staff,
            exp: 2_000_000_000,
            iat: 1_900_000_000,
        }
    }

    #[test]
    fn test_is_admin() {
        assert!(claims(UserType::Admin, false).is_admin());
        assert!(claims(UserType::Parent, true).is_admin());
        assert!(!claims(UserType::NurseryManager, false).is_admin());
    }

    #[test]
    fn test_user_id_parsing() {
        let c = claims(UserType::Parent, false);
        assert_eq!(c.user_id().unwrap().to_string(), c.sub);

        let broken = Claims {
            sub: "not-a-uuid".to_string(),
            ..c
        };
        assert!(broken.user_id().is_err());
    }

    #[test]
    fn test_claims_serialize_user_type() {
        let json = serde_json::to_value(claims(UserType::NurseryAssistant, false)).unwrap();
        assert_eq!(json["user_type"], "nursery_assistant");
    }
}
