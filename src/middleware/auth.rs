use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use creche_auth::{Claims, verify_token};
use creche_core::AppError;
use creche_models::UserType;
use uuid::Uuid;

use crate::state::AppState;

/// Extractor that validates the bearer token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        self.0.user_id()
    }

    pub fn user_type(&self) -> UserType {
        self.0.user_type
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Generates an extractor that authenticates and then applies a user-type check
/// from [`crate::middleware::role`].
#[macro_export]
macro_rules! require_user_type {
    ($name:ident, $check:path, $message:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = creche_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                if !$check(&auth_user) {
                    return Err(creche_core::AppError::forbidden($message.to_string()));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_user_type!(
    RequireParent,
    crate::middleware::role::is_parent,
    "Only parents can access this resource"
);
require_user_type!(
    RequireNurseryManager,
    crate::middleware::role::is_manager_or_admin,
    "Only nursery managers can access this resource"
);
require_user_type!(
    RequireAdmin,
    crate::middleware::role::is_admin,
    "Only administrators can access this resource"
);

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user(user_type: UserType, is_staff: bool) -> AuthUser {
        AuthUser(Claims {
            sub: Uuid::new_v4().to_string(),
            username: "tester".to_string(),
            user_type,
            is_staff,
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_user_id() {
        let user = auth_user(UserType::Parent, false);
        assert_eq!(user.user_id().unwrap().to_string(), user.0.sub);
    }

    #[test]
    fn test_accessors() {
        let user = auth_user(UserType::NurseryAssistant, false);
        assert_eq!(user.user_type(), UserType::NurseryAssistant);
        assert_eq!(user.username(), "tester");
        assert!(!user.is_admin());
        assert!(auth_user(UserType::Parent, true).is_admin());
    }
}
