//! Weekly opening schedule of a nursery.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OpeningHour {
    pub id: Uuid,
    pub nursery_id: Uuid,
    /// 0 = Monday ... 6 = Sunday
    pub day: i16,
    #[schema(value_type = Option<String>, example = "08:00:00")]
    pub open_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:30:00")]
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_slot"))]
pub struct OpeningHourDto {
    #[validate(range(min = 0, max = 6, message = "day must be between 0 (Monday) and 6 (Sunday)"))]
    pub day: i16,
    #[schema(value_type = Option<String>, example = "08:00:00")]
    pub open_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:30:00")]
    pub close_time: Option<NaiveTime>,
    #[serde(default)]
    pub is_closed: bool,
}

fn validate_slot(dto: &OpeningHourDto) -> Result<(), ValidationError> {
    if dto.is_closed {
        return Ok(());
    }
    match (dto.open_time, dto.close_time) {
        (Some(open), Some(close)) if open < close => Ok(()),
        (Some(_), Some(_)) => Err(ValidationError::new("opening_hours")
            .with_message("open_time must be before close_time".into())),
        _ => Err(ValidationError::new("opening_hours")
            .with_message("open_time and close_time are required unless the day is closed".into())),
    }
}

/// Validates a full weekly schedule: every slot on its own, then day uniqueness.
pub fn validate_schedule(hours: &[OpeningHourDto]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut seen = HashSet::new();

    for hour in hours {
        if let Err(slot_errors) = hour.validate() {
            return Err(slot_errors);
        }
        if !seen.insert(hour.day) {
            errors.add(
                "day",
                ValidationError::new("duplicate_day")
                    .with_message(format!("day {} appears more than once", hour.day).into()),
            );
            return Err(errors);
        }
    }

    Ok(())
}
