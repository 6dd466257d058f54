//! Children registered by parents.

use chrono::{DateTime, NaiveDate, Utc};
use creche_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::users::validate_past_date;

/// Flat row of `children JOIN profiles JOIN users` (parent columns prefixed).
#[derive(Debug, Clone, FromRow)]
pub struct ChildRow {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub birthday: NaiveDate,
    pub joined_date: NaiveDate,
    pub detail: Option<String>,
    pub existe: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub parent_user_id: Uuid,
    pub parent_username: String,
    pub parent_first_name: String,
    pub parent_last_name: String,
    pub parent_email: String,
    pub parent_contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParentSummary {
    /// Profile id
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChildResponse {
    pub id: Uuid,
    pub parent: ParentSummary,
    pub last_name: String,
    pub first_name: String,
    pub birthday: NaiveDate,
    pub joined_date: NaiveDate,
    pub detail: Option<String>,
    pub existe: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChildRow> for ChildResponse {
    fn from(row: ChildRow) -> Self {
        Self {
            id: row.id,
            parent: ParentSummary {
                id: row.parent_id,
                user_id: row.parent_user_id,
                username: row.parent_username,
                first_name: row.parent_first_name,
                last_name: row.parent_last_name,
                email: row.parent_email,
                contact: row.parent_contact,
            },
            last_name: row.last_name,
            first_name: row.first_name,
            birthday: row.birthday,
            joined_date: row.joined_date,
            detail: row.detail,
            existe: row.existe,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateChildDto {
    #[validate(length(min = 1, max = 100, message = "last_name must be 1-100 characters"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100, message = "first_name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(custom(function = "validate_past_date"))]
    pub birthday: NaiveDate,
    /// Defaults to today
    pub joined_date: Option<NaiveDate>,
    #[validate(length(max = 500, message = "detail must be at most 500 characters"))]
    pub detail: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateChildDto {
    #[validate(length(min = 1, max = 100, message = "last_name must be 1-100 characters"))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "first_name must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[validate(custom(function = "validate_past_date"))]
    pub birthday: Option<NaiveDate>,
    pub joined_date: Option<NaiveDate>,
    #[validate(length(max = 500, message = "detail must be at most 500 characters"))]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ChildFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedChildrenResponse {
    pub data: Vec<ChildResponse>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dto(birthday: NaiveDate) -> CreateChildDto {
        CreateChildDto {
            last_name: "Martin".to_string(),
            first_name: "Zoé".to_string(),
            birthday,
            joined_date: None,
            detail: Some("Allergic to peanuts".to_string()),
        }
    }

    #[test]
    fn test_birthday_today_is_allowed() {
        assert!(dto(Utc::now().date_naive()).validate().is_ok());
    }

    #[test]
    fn test_birthday_in_future_is_rejected() {
        let tomorrow = Utc::now().date_naive() + Duration::days(1);
        let errors = dto(tomorrow).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("birthday"));
    }

    #[test]
    fn test_detail_length() {
        let mut child = dto(NaiveDate::from_ymd_opt(2023, 4, 2).unwrap());
        child.detail = Some("x".repeat(501));
        assert!(child.validate().is_err());
    }

    #[test]
    fn test_update_birthday_checked_only_when_present() {
        assert!(UpdateChildDto::default().validate().is_ok());
        let update = UpdateChildDto {
            birthday: Some(Utc::now().date_naive() + Duration::days(30)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
