use creche_core::AppError;
use creche_db::PgPool;
use sqlx::FromRow;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::middleware::auth::AuthUser;

/// How the caller relates to a given nursery, strongest relation first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NurseryAccess {
    Admin,
    Manager,
    AssistantManager,
    Assistant,
    None,
}

impl NurseryAccess {
    pub fn can_read(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn can_manage(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager | Self::AssistantManager)
    }

    /// Owner-level rights: activities and classroom activity edits.
    pub fn is_owner_or_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    pub fn require_read(self) -> Result<Self, AppError> {
        if self.can_read() {
            Ok(self)
        } else {
            Err(AppError::forbidden(
                "You do not have access to this nursery".to_string(),
            ))
        }
    }

    pub fn require_manage(self) -> Result<Self, AppError> {
        if self.can_manage() {
            Ok(self)
        } else {
            Err(AppError::forbidden(
                "You are not allowed to manage this nursery".to_string(),
            ))
        }
    }

    pub fn require_owner_or_admin(self) -> Result<Self, AppError> {
        if self.is_owner_or_admin() {
            Ok(self)
        } else {
            Err(AppError::forbidden(
                "Only the nursery manager can perform this action".to_string(),
            ))
        }
    }
}

#[derive(Debug, FromRow)]
struct AccessRow {
    manager_id: Uuid,
    profile_id: Option<Uuid>,
    assistant_is_manager: Option<bool>,
}

fn classify(
    is_admin: bool,
    manager_id: Uuid,
    profile_id: Option<Uuid>,
    assistant_is_manager: Option<bool>,
) -> NurseryAccess {
    if is_admin {
        return NurseryAccess::Admin;
    }
    if profile_id == Some(manager_id) {
        return NurseryAccess::Manager;
    }
    match assistant_is_manager {
        Some(true) => NurseryAccess::AssistantManager,
        Some(false) => NurseryAccess::Assistant,
        None => NurseryAccess::None,
    }
}

/// Resolves the caller's relation to `nursery_id`. Unknown nurseries are 404.
#[instrument(skip(db, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn resolve_nursery_access(
    db: &PgPool,
    auth_user: &AuthUser,
    nursery_id: Uuid,
) -> Result<NurseryAccess, AppError> {
    let user_id = auth_user.user_id()?;

    let row = sqlx::query_as::<_, AccessRow>(
        r#"SELECT n.manager_id, p.id AS profile_id, a.is_manager AS assistant_is_manager
           FROM nurseries n
           LEFT JOIN profiles p ON p.user_id = $2
           LEFT JOIN nursery_assistants a
                  ON a.nursery_id = n.id AND a.profile_id = p.id AND a.active
           WHERE n.id = $1"#,
    )
    .bind(nursery_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Nursery not found")))?;

    let access = classify(
        auth_user.is_admin(),
        row.manager_id,
        row.profile_id,
        row.assistant_is_manager,
    );
    debug!(nursery.id = %nursery_id, access = ?access, "Resolved nursery access");
    Ok(access)
}

/// Profile id of the authenticated account.
pub async fn current_profile_id(db: &PgPool, auth_user: &AuthUser) -> Result<Uuid, AppError> {
    let user_id = auth_user.user_id()?;

    sqlx::query_scalar::<_, Uuid>("SELECT id FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("No profile found for this account".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_wins_over_everything() {
        let manager = Uuid::new_v4();
        assert_eq!(
            classify(true, manager, Some(Uuid::new_v4()), None),
            NurseryAccess::Admin
        );
        assert_eq!(classify(true, manager, None, None), NurseryAccess::Admin);
    }

    #[test]
    fn test_owner_is_manager() {
        let manager = Uuid::new_v4();
        assert_eq!(
            classify(false, manager, Some(manager), Some(false)),
            NurseryAccess::Manager
        );
    }

    #[test]
    fn test_assistant_levels() {
        let manager = Uuid::new_v4();
        let me = Some(Uuid::new_v4());
        assert_eq!(
            classify(false, manager, me, Some(true)),
            NurseryAccess::AssistantManager
        );
        assert_eq!(
            classify(false, manager, me, Some(false)),
            NurseryAccess::Assistant
        );
        assert_eq!(classify(false, manager, me, None), NurseryAccess::None);
    }

    #[test]
    fn test_predicates() {
        use NurseryAccess::*;

        for access in [Admin, Manager, AssistantManager, Assistant] {
            assert!(access.can_read());
        }
        assert!(!None.can_read());

        assert!(Admin.can_manage());
        assert!(Manager.can_manage());
        assert!(AssistantManager.can_manage());
        assert!(!Assistant.can_manage());
        assert!(!None.can_manage());

        assert!(Admin.is_owner_or_admin());
        assert!(Manager.is_owner_or_admin());
        assert!(!AssistantManager.is_owner_or_admin());
    }

    #[test]
    fn test_require_helpers_forbid() {
        use axum::http::StatusCode;

        assert_eq!(
            NurseryAccess::None.require_read().unwrap_err().status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            NurseryAccess::Assistant.require_manage().unwrap_err().status,
            StatusCode::FORBIDDEN
        );
        assert!(NurseryAccess::AssistantManager.require_manage().is_ok());
        assert!(
            NurseryAccess::AssistantManager
                .require_owner_or_admin()
                .is_err()
        );
    }
}
