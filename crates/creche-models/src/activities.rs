//! Nursery activities and their scheduling in classrooms.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use creche_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Educational,
    Recreational,
    Cultural,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Activity {
    pub id: Uuid,
    pub nursery_id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub valide: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateActivityDto {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub valide: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateActivityDto {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<ActivityType>,
    pub valide: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ActivityFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedActivitiesResponse {
    pub data: Vec<Activity>,
    pub meta: PaginationMeta,
}

/// Classroom schedule entry joined with its activity's name and type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassroomActivity {
    pub id: Uuid,
    pub classroom_id: Uuid,
    pub activity_id: Uuid,
    pub activity_name: String,
    pub activity_type: ActivityType,
    pub active: bool,
    pub date: NaiveDate,
    #[schema(value_type = String, example = "09:30:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:15:00")]
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_new_slot"))]
pub struct CreateClassroomActivityDto {
    pub activity_id: Uuid,
    pub date: NaiveDate,
    #[schema(value_type = String, example = "09:30:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:15:00")]
    pub end_time: NaiveTime,
    pub active: Option<bool>,
}

fn validate_new_slot(dto: &CreateClassroomActivityDto) -> Result<(), ValidationError> {
    check_slot(dto.start_time, dto.end_time)
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClassroomActivityDto {
    pub date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    pub active: Option<bool>,
}

pub fn check_slot(start_time: NaiveTime, end_time: NaiveTime) -> Result<(), ValidationError> {
    if start_time >= end_time {
        return Err(ValidationError::new("time_slot")
            .with_message("start_time must be before end_time".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedClassroomActivitiesResponse {
    pub data: Vec<ClassroomActivity>,
    pub meta: PaginationMeta,
}
