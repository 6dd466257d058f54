//! User-type predicates used by the extractors in [`crate::middleware::auth`]
//! and by handlers that branch on the caller's type.

use creche_models::UserType;

use crate::middleware::auth::AuthUser;

pub fn is_admin(auth_user: &AuthUser) -> bool {
    auth_user.is_admin()
}

pub fn is_parent(auth_user: &AuthUser) -> bool {
    auth_user.user_type() == UserType::Parent
}

pub fn is_manager_or_admin(auth_user: &AuthUser) -> bool {
    auth_user.user_type() == UserType::NurseryManager || auth_user.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use creche_auth::Claims;

    fn user(user_type: UserType, is_staff: bool) -> AuthUser {
        AuthUser(Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            username: "u".to_string(),
            user_type,
            is_staff,
            exp: 9999999999,
            iat: 1,
        })
    }

    #[test]
    fn test_predicates() {
        assert!(is_parent(&user(UserType::Parent, false)));
        assert!(!is_parent(&user(UserType::NurseryManager, false)));

        assert!(is_manager_or_admin(&user(UserType::NurseryManager, false)));
        assert!(is_manager_or_admin(&user(UserType::Admin, false)));
        assert!(is_manager_or_admin(&user(UserType::Parent, true)));
        assert!(!is_manager_or_admin(&user(UserType::NurseryAssistant, false)));

        assert!(is_admin(&user(UserType::Admin, false)));
        assert!(!is_admin(&user(UserType::NurseryManager, false)));
    }
}
