//! Parent subscriptions to nursery plans and their per-child details.

use chrono::{DateTime, NaiveDate, Utc};
use creche_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::plans::PlanDuration;

#[derive(Debug, Clone, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub price: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `subscription_details` joined with child, classroom and group names.
#[derive(Debug, Clone, FromRow)]
pub struct DetailRow {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub child_id: Uuid,
    pub child_first_name: String,
    pub child_last_name: String,
    pub child_birthday: NaiveDate,
    pub classroom_id: Option<Uuid>,
    pub classroom_name: Option<String>,
    pub group_id: Option<Uuid>,
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChildRef {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DetailObject {
    pub id: Uuid,
    pub child: ChildRef,
    pub classroom: Option<NamedRef>,
    pub group: Option<NamedRef>,
}

impl From<DetailRow> for DetailObject {
    fn from(row: DetailRow) -> Self {
        Self {
            id: row.id,
            child: ChildRef {
                id: row.child_id,
                first_name: row.child_first_name,
                last_name: row.child_last_name,
                birthday: row.child_birthday,
            },
            classroom: named(row.classroom_id, row.classroom_name),
            group: named(row.group_id, row.group_name),
        }
    }
}

fn named(id: Option<Uuid>, name: Option<String>) -> Option<NamedRef> {
    match (id, name) {
        (Some(id), Some(name)) => Some(NamedRef { id, name }),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub price: i64,
    pub is_active: bool,
    pub detail_objects: Vec<DetailObject>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionResponse {
    pub fn new(subscription: Subscription, detail_objects: Vec<DetailObject>) -> Self {
        Self {
            id: subscription.id,
            parent_id: subscription.parent_id,
            plan_id: subscription.plan_id,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            price: subscription.price,
            is_active: subscription.is_active,
            detail_objects,
            created_at: subscription.created_at,
            updated_at: subscription.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionDetailDto {
    pub child_id: Uuid,
    pub classroom_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_new_period"))]
pub struct CreateSubscriptionDto {
    /// Defaults to today
    pub start_date: Option<NaiveDate>,
    /// Derived from the plan duration when absent
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    #[validate(
        length(min = 1, message = "at least one child is required"),
        custom(function = "validate_unique_children")
    )]
    pub details: Vec<SubscriptionDetailDto>,
}

fn validate_new_period(dto: &CreateSubscriptionDto) -> Result<(), ValidationError> {
    match (dto.start_date, dto.end_date) {
        (Some(start), Some(end)) => check_period(start, Some(end)),
        _ => Ok(()),
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSubscriptionDto {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    /// Move to another active plan of the same nursery
    pub plan_id: Option<Uuid>,
    /// Replaces every detail when present
    #[validate(
        length(min = 1, message = "at least one child is required"),
        custom(function = "validate_unique_children")
    )]
    pub details: Option<Vec<SubscriptionDetailDto>>,
}

fn validate_unique_children(details: &[SubscriptionDetailDto]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if details.iter().all(|d| seen.insert(d.child_id)) {
        Ok(())
    } else {
        Err(ValidationError::new("duplicate_child")
            .with_message("a child can only appear once per subscription".into()))
    }
}

/// `end_date` may not precede `start_date`.
pub fn check_period(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => Err(ValidationError::new("period")
            .with_message("end_date must be on or after start_date".into())),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct SubscriptionFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedSubscriptionsResponse {
    pub data: Vec<SubscriptionResponse>,
    pub meta: PaginationMeta,
}

/// Subscription row joined with its plan and nursery.
#[derive(Debug, Clone, FromRow)]
pub struct MySubscriptionRow {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub price: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub plan_id: Uuid,
    pub plan_name: String,
    pub plan_duration: PlanDuration,
    pub nursery_id: Uuid,
    pub nursery_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlanSummary {
    pub id: Uuid,
    pub name: String,
    pub duration: PlanDuration,
    pub nursery: NamedRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MySubscriptionResponse {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub price: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub plan: PlanSummary,
    pub detail_objects: Vec<DetailObject>,
}

impl MySubscriptionResponse {
    pub fn new(row: MySubscriptionRow, detail_objects: Vec<DetailObject>) -> Self {
        Self {
            id: row.id,
            start_date: row.start_date,
            end_date: row.end_date,
            price: row.price,
            is_active: row.is_active,
            created_at: row.created_at,
            plan: PlanSummary {
                id: row.plan_id,
                name: row.plan_name,
                duration: row.plan_duration,
                nursery: NamedRef {
                    id: row.nursery_id,
                    name: row.nursery_name,
                },
            },
            detail_objects,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedMySubscriptionsResponse {
    pub data: Vec<MySubscriptionResponse>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(child_id: Uuid) -> SubscriptionDetailDto {
        SubscriptionDetailDto {
            child_id,
            classroom_id: None,
            group_id: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_details_are_required() {
        let dto = CreateSubscriptionDto {
            start_date: None,
            end_date: None,
            is_active: None,
            details: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_duplicate_children_are_rejected() {
        let child = Uuid::new_v4();
        let dto = CreateSubscriptionDto {
            start_date: None,
            end_date: None,
            is_active: None,
            details: vec![detail(child), detail(child)],
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("details"));

        let dto = CreateSubscriptionDto {
            details: vec![detail(child), detail(Uuid::new_v4())],
            ..dto
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let dto = CreateSubscriptionDto {
            start_date: Some(date(2025, 9, 1)),
            end_date: Some(date(2025, 8, 31)),
            is_active: None,
            details: vec![detail(Uuid::new_v4())],
        };
        assert!(dto.validate().is_err());
        assert!(check_period(date(2025, 9, 1), Some(date(2025, 9, 1))).is_ok());
        assert!(check_period(date(2025, 9, 1), None).is_ok());
    }

    #[test]
    fn test_update_details_checked_only_when_present() {
        assert!(UpdateSubscriptionDto::default().validate().is_ok());
        let update = UpdateSubscriptionDto {
            details: Some(vec![]),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_detail_object_omits_unassigned_classroom() {
        let row = DetailRow {
            id: Uuid::new_v4(),
            subscription_id: Uuid::new_v4(),
            child_id: Uuid::new_v4(),
            child_first_name: "Noé".to_string(),
            child_last_name: "Bernard".to_string(),
            child_birthday: date(2023, 5, 10),
            classroom_id: None,
            classroom_name: None,
            group_id: None,
            group_name: None,
        };
        let object = DetailObject::from(row);
        assert!(object.classroom.is_none());
        assert_eq!(object.child.first_name, "Noé");
    }
}
