use creche_core::{AppError, PaginationParams};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::classroom_activities::model::{
    ClassroomActivity, CreateClassroomActivityDto, PaginatedClassroomActivitiesResponse,
    UpdateClassroomActivityDto, check_slot,
};
use crate::utils::db_errors::conflict_on_unique;

const SCHEDULE_SELECT: &str = r#"SELECT ca.id, ca.classroom_id, ca.activity_id,
       a.name AS activity_name, a.activity_type, ca.active, ca.date,
       ca.start_time, ca.end_time, ca.created_at
FROM classroom_activities ca
JOIN activities a ON a.id = ca.activity_id"#;

const DUPLICATE_ACTIVITY: &str = "This activity is already scheduled in this classroom";

pub struct ClassroomActivityService;

impl ClassroomActivityService {
    /// Schedules an activity of the nursery in one of its classrooms.
    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "classroom_activities"))]
    pub async fn create_classroom_activity(
        db: &PgPool,
        nursery_id: Uuid,
        classroom_id: Uuid,
        dto: CreateClassroomActivityDto,
    ) -> Result<ClassroomActivity, AppError> {
        let same_nursery = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM activities WHERE id = $1 AND nursery_id = $2)",
        )
        .bind(dto.activity_id)
        .bind(nursery_id)
        .fetch_one(db)
        .await?;

        if !same_nursery {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "activity_id does not belong to this nursery"
            )));
        }

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO classroom_activities
                   (classroom_id, activity_id, active, date, start_time, end_time)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(classroom_id)
        .bind(dto.activity_id)
        .bind(dto.active.unwrap_or(true))
        .bind(dto.date)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .fetch_one(db)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_ACTIVITY))?;

        info!(
            schedule.id = %id,
            classroom.id = %classroom_id,
            activity.id = %dto.activity_id,
            "Activity scheduled"
        );
        Self::get_classroom_activity(db, classroom_id, id).await
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "classroom_activities"))]
    pub async fn list_classroom_activities(
        db: &PgPool,
        classroom_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<PaginatedClassroomActivitiesResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM classroom_activities WHERE classroom_id = $1",
        )
        .bind(classroom_id)
        .fetch_one(db)
        .await?;

        let query = format!(
            "{} WHERE ca.classroom_id = $1 ORDER BY ca.date, ca.start_time, ca.id LIMIT {} OFFSET {}",
            SCHEDULE_SELECT,
            pagination.limit(),
            pagination.offset()
        );
        let data = sqlx::query_as::<_, ClassroomActivity>(&query)
            .bind(classroom_id)
            .fetch_all(db)
            .await?;

        Ok(PaginatedClassroomActivitiesResponse {
            data,
            meta: pagination.meta(total),
        })
    }

    pub async fn get_classroom_activity(
        db: &PgPool,
        classroom_id: Uuid,
        schedule_id: Uuid,
    ) -> Result<ClassroomActivity, AppError> {
        let query = format!("{} WHERE ca.id = $1 AND ca.classroom_id = $2", SCHEDULE_SELECT);

        sqlx::query_as::<_, ClassroomActivity>(&query)
            .bind(schedule_id)
            .bind(classroom_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Classroom activity not found")))
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "classroom_activities"))]
    pub async fn update_classroom_activity(
        db: &PgPool,
        classroom_id: Uuid,
        schedule_id: Uuid,
        dto: UpdateClassroomActivityDto,
    ) -> Result<ClassroomActivity, AppError> {
        let existing = Self::get_classroom_activity(db, classroom_id, schedule_id).await?;

        let date = dto.date.unwrap_or(existing.date);
        let start_time = dto.start_time.unwrap_or(existing.start_time);
        let end_time = dto.end_time.unwrap_or(existing.end_time);
        let active = dto.active.unwrap_or(existing.active);

        check_slot(start_time, end_time).map_err(|e| {
            AppError::unprocessable(anyhow::anyhow!(
                "{}",
                e.message.unwrap_or_else(|| "Invalid time slot".into())
            ))
        })?;

        sqlx::query(
            r#"UPDATE classroom_activities
               SET date = $1, start_time = $2, end_time = $3, active = $4, updated_at = NOW()
               WHERE id = $5"#,
        )
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(active)
        .bind(schedule_id)
        .execute(db)
        .await?;

        Self::get_classroom_activity(db, classroom_id, schedule_id).await
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "classroom_activities"))]
    pub async fn delete_classroom_activity(
        db: &PgPool,
        classroom_id: Uuid,
        schedule_id: Uuid,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM classroom_activities WHERE id = $1 AND classroom_id = $2")
                .bind(schedule_id)
                .bind(classroom_id)
                .execute(db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Classroom activity not found"
            )));
        }

        info!(schedule.id = %schedule_id, "Classroom activity deleted");
        Ok(())
    }
}
