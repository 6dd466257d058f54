//! Subscription plans offered by a nursery.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use creche_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanDuration {
    #[default]
    None,
    Day,
    Week,
    Month,
    Quarter,
    Semester,
    Year,
}

impl PlanDuration {
    /// End date of a subscription starting on `start`. `None` plans are open-ended.
    pub fn end_date(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::None => None,
            Self::Day => start.checked_add_days(Days::new(1)),
            Self::Week => start.checked_add_days(Days::new(7)),
            Self::Month => start.checked_add_months(Months::new(1)),
            Self::Quarter => start.checked_add_months(Months::new(3)),
            Self::Semester => start.checked_add_months(Months::new(6)),
            Self::Year => start.checked_add_months(Months::new(12)),
        }
    }
}

/// SQL expression ordering plans from shortest to longest duration.
pub const DURATION_ORDER_SQL: &str = "CASE duration WHEN 'none' THEN 0 WHEN 'day' THEN 1 \
     WHEN 'week' THEN 2 WHEN 'month' THEN 3 WHEN 'quarter' THEN 4 WHEN 'semester' THEN 5 ELSE 6 END";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Plan {
    pub id: Uuid,
    pub nursery_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Minor currency units
    pub price: i64,
    pub duration: PlanDuration,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePlanDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price: i64,
    pub duration: Option<PlanDuration>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePlanDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price: Option<i64>,
    pub duration: Option<PlanDuration>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PlanFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedPlansResponse {
    pub data: Vec<Plan>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_length_durations() {
        let start = date(2025, 2, 27);
        assert_eq!(PlanDuration::Day.end_date(start), Some(date(2025, 2, 28)));
        assert_eq!(PlanDuration::Week.end_date(start), Some(date(2025, 3, 6)));
    }

    #[test]
    fn test_calendar_durations() {
        let start = date(2025, 1, 15);
        assert_eq!(PlanDuration::Month.end_date(start), Some(date(2025, 2, 15)));
        assert_eq!(PlanDuration::Quarter.end_date(start), Some(date(2025, 4, 15)));
        assert_eq!(PlanDuration::Semester.end_date(start), Some(date(2025, 7, 15)));
        assert_eq!(PlanDuration::Year.end_date(start), Some(date(2026, 1, 15)));
    }

    #[test]
    fn test_month_end_is_clamped() {
        assert_eq!(
            PlanDuration::Month.end_date(date(2025, 1, 31)),
            Some(date(2025, 2, 28))
        );
    }

    #[test]
    fn test_open_ended_plan() {
        assert_eq!(PlanDuration::None.end_date(date(2025, 1, 1)), None);
        assert_eq!(PlanDuration::default(), PlanDuration::None);
    }

    #[test]
    fn test_price_cannot_be_negative() {
        let dto = CreatePlanDto {
            name: "Mensuel".to_string(),
            description: None,
            price: -100,
            duration: Some(PlanDuration::Month),
            is_active: None,
        };
        assert!(dto.validate().is_err());
    }
}
