//! Classrooms and the groups they are split into.

use chrono::{DateTime, Utc};
use creche_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::assistants::AssistantSummary;

#[derive(Debug, Clone, FromRow)]
pub struct Classroom {
    pub id: Uuid,
    pub nursery_id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub age_range_start: i32,
    pub age_range_end: i32,
    pub nbr_children: i32,
    pub existe: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassroomResponse {
    pub id: Uuid,
    pub nursery_id: Uuid,
    pub name: String,
    pub capacity: i32,
    /// Months
    pub age_range_start: i32,
    /// Months
    pub age_range_end: i32,
    pub nbr_children: i32,
    pub existe: bool,
    pub assistants: Vec<AssistantSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClassroomResponse {
    pub fn new(classroom: Classroom, assistants: Vec<AssistantSummary>) -> Self {
        Self {
            id: classroom.id,
            nursery_id: classroom.nursery_id,
            name: classroom.name,
            capacity: classroom.capacity,
            age_range_start: classroom.age_range_start,
            age_range_end: classroom.age_range_end,
            nbr_children: classroom.nbr_children,
            existe: classroom.existe,
            assistants,
            created_at: classroom.created_at,
            updated_at: classroom.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_new_classroom"))]
pub struct CreateClassroomDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(range(min = 0, message = "capacity cannot be negative"))]
    pub capacity: i32,
    #[validate(range(min = 0, message = "age_range_start cannot be negative"))]
    pub age_range_start: i32,
    #[validate(range(min = 0, message = "age_range_end cannot be negative"))]
    pub age_range_end: i32,
    #[validate(range(min = 0, message = "nbr_children cannot be negative"))]
    pub nbr_children: Option<i32>,
    pub existe: Option<bool>,
}

fn validate_new_classroom(dto: &CreateClassroomDto) -> Result<(), ValidationError> {
    check_classroom_bounds(
        dto.age_range_start,
        dto.age_range_end,
        dto.nbr_children.unwrap_or(0),
        dto.capacity,
    )
}

/// Partial update. Cross-field rules are re-checked against the merged row.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClassroomDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "capacity cannot be negative"))]
    pub capacity: Option<i32>,
    #[validate(range(min = 0, message = "age_range_start cannot be negative"))]
    pub age_range_start: Option<i32>,
    #[validate(range(min = 0, message = "age_range_end cannot be negative"))]
    pub age_range_end: Option<i32>,
    #[validate(range(min = 0, message = "nbr_children cannot be negative"))]
    pub nbr_children: Option<i32>,
    pub existe: Option<bool>,
}

/// Age range ordering and occupancy limit shared by create and update.
pub fn check_classroom_bounds(
    age_range_start: i32,
    age_range_end: i32,
    nbr_children: i32,
    capacity: i32,
) -> Result<(), ValidationError> {
    if age_range_start > age_range_end {
        return Err(ValidationError::new("age_range")
            .with_message("age_range_start must not exceed age_range_end".into()));
    }
    if nbr_children > capacity {
        return Err(ValidationError::new("capacity")
            .with_message("nbr_children cannot exceed capacity".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ClassroomFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedClassroomsResponse {
    pub data: Vec<ClassroomResponse>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, FromRow)]
pub struct Group {
    pub id: Uuid,
    pub classroom_id: Uuid,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupResponse {
    pub id: Uuid,
    pub classroom_id: Uuid,
    pub name: String,
    pub active: bool,
    pub assistants: Vec<AssistantSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupResponse {
    pub fn new(group: Group, assistants: Vec<AssistantSummary>) -> Self {
        Self {
            id: group.id,
            classroom_id: group.classroom_id,
            name: group.name,
            active: group.active,
            assistants,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct GroupFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGroupDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateGroupDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedGroupsResponse {
    pub data: Vec<GroupResponse>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classroom(start: i32, end: i32, capacity: i32, children: Option<i32>) -> CreateClassroomDto {
        CreateClassroomDto {
            name: "Les Chatons".to_string(),
            capacity,
            age_range_start: start,
            age_range_end: end,
            nbr_children: children,
            existe: None,
        }
    }

    #[test]
    fn test_valid_classroom() {
        assert!(classroom(12, 24, 10, Some(8)).validate().is_ok());
        assert!(classroom(12, 12, 0, None).validate().is_ok());
    }

    #[test]
    fn test_age_range_must_be_ordered() {
        assert!(classroom(24, 12, 10, None).validate().is_err());
    }

    #[test]
    fn test_children_cannot_exceed_capacity() {
        assert!(classroom(0, 12, 5, Some(6)).validate().is_err());
    }

    #[test]
    fn test_name_length() {
        let mut dto = classroom(0, 12, 5, None);
        dto.name = "x".repeat(101);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_group_dto_validation() {
        assert!(CreateGroupDto { name: "Rouges".to_string(), active: None }.validate().is_ok());
        assert!(CreateGroupDto { name: String::new(), active: None }.validate().is_err());
        assert!(UpdateGroupDto::default().validate().is_ok());
    }
}
