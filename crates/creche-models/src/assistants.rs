//! Nursery staff assignments.

use chrono::{DateTime, NaiveDate, Utc};
use creche_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::users::{NewProfileDto, Profile, User, UserType};

/// Flat row of `nursery_assistants JOIN profiles JOIN users`.
#[derive(Debug, Clone, FromRow)]
pub struct AssistantRow {
    pub id: Uuid,
    pub nursery_id: Uuid,
    pub classroom_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub is_manager: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub profile_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub user_type: UserType,
    pub profile_created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssistantResponse {
    pub id: Uuid,
    pub profile: Profile,
    pub nursery_id: Uuid,
    pub classroom_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub is_manager: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AssistantRow> for AssistantResponse {
    fn from(row: AssistantRow) -> Self {
        Self {
            id: row.id,
            profile: Profile {
                id: row.profile_id,
                user: User {
                    id: row.user_id,
                    username: row.username,
                    email: row.email,
                    first_name: row.first_name,
                    last_name: row.last_name,
                    is_staff: row.is_staff,
                },
                contact: row.contact,
                address: row.address,
                birthday: row.birthday,
                user_type: row.user_type,
                created_at: row.profile_created_at,
            },
            nursery_id: row.nursery_id,
            classroom_id: row.classroom_id,
            group_id: row.group_id,
            is_manager: row.is_manager,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

/// Compact form embedded in classroom and group responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AssistantSummary {
    pub id: Uuid,
    pub full_name: String,
    pub is_manager: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAssistantDto {
    #[validate(nested)]
    pub profile: NewProfileDto,
    pub classroom_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub is_manager: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAssistantDto {
    pub classroom_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub is_manager: Option<bool>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AssistantFilterParams {
    pub classroom_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAssistantsResponse {
    pub data: Vec<AssistantResponse>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assistant_payload_shape() {
        let dto: CreateAssistantDto = serde_json::from_str(
            r#"{
                "profile": {
                    "user": {"username": "helper", "email": "helper@creche.io", "password": "password123"},
                    "contact": "0700000000"
                },
                "is_manager": true
            }"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.is_manager, Some(true));
        assert!(dto.classroom_id.is_none());
    }

    #[test]
    fn test_create_assistant_validates_nested_user() {
        let dto: CreateAssistantDto = serde_json::from_str(
            r#"{"profile": {"user": {"username": "helper", "email": "nope", "password": "password123"}}}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());
    }
}
