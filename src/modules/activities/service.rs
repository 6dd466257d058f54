use creche_core::{AppError, PaginationParams};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::activities::model::{
    Activity, CreateActivityDto, PaginatedActivitiesResponse, UpdateActivityDto,
};

const ACTIVITY_COLUMNS: &str = "id, nursery_id, name, description, activity_type, valide, created_at";

pub struct ActivityService;

impl ActivityService {
    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "activities"))]
    pub async fn create_activity(
        db: &PgPool,
        nursery_id: Uuid,
        dto: CreateActivityDto,
    ) -> Result<Activity, AppError> {
        let query = format!(
            r#"INSERT INTO activities (nursery_id, name, description, activity_type, valide)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {}"#,
            ACTIVITY_COLUMNS
        );

        let activity = sqlx::query_as::<_, Activity>(&query)
            .bind(nursery_id)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(dto.activity_type)
            .bind(dto.valide.unwrap_or(true))
            .fetch_one(db)
            .await?;

        info!(activity.id = %activity.id, nursery.id = %nursery_id, "Activity created");
        Ok(activity)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "activities"))]
    pub async fn list_activities(
        db: &PgPool,
        nursery_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<PaginatedActivitiesResponse, AppError> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activities WHERE nursery_id = $1")
                .bind(nursery_id)
                .fetch_one(db)
                .await?;

        let query = format!(
            "SELECT {} FROM activities WHERE nursery_id = $1 ORDER BY name, id LIMIT {} OFFSET {}",
            ACTIVITY_COLUMNS,
            pagination.limit(),
            pagination.offset()
        );
        let activities = sqlx::query_as::<_, Activity>(&query)
            .bind(nursery_id)
            .fetch_all(db)
            .await?;

        Ok(PaginatedActivitiesResponse {
            data: activities,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "activities"))]
    pub async fn get_activity(
        db: &PgPool,
        nursery_id: Uuid,
        activity_id: Uuid,
    ) -> Result<Activity, AppError> {
        let query = format!(
            "SELECT {} FROM activities WHERE id = $1 AND nursery_id = $2",
            ACTIVITY_COLUMNS
        );

        sqlx::query_as::<_, Activity>(&query)
            .bind(activity_id)
            .bind(nursery_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Activity not found")))
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "activities"))]
    pub async fn update_activity(
        db: &PgPool,
        nursery_id: Uuid,
        activity_id: Uuid,
        dto: UpdateActivityDto,
    ) -> Result<Activity, AppError> {
        let existing = Self::get_activity(db, nursery_id, activity_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let description = dto.description.unwrap_or(existing.description);
        let activity_type = dto.activity_type.unwrap_or(existing.activity_type);
        let valide = dto.valide.unwrap_or(existing.valide);

        let query = format!(
            r#"UPDATE activities
               SET name = $1, description = $2, activity_type = $3, valide = $4, updated_at = NOW()
               WHERE id = $5
               RETURNING {}"#,
            ACTIVITY_COLUMNS
        );

        let activity = sqlx::query_as::<_, Activity>(&query)
            .bind(&name)
            .bind(&description)
            .bind(activity_type)
            .bind(valide)
            .bind(activity_id)
            .fetch_one(db)
            .await?;

        Ok(activity)
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "activities"))]
    pub async fn delete_activity(
        db: &PgPool,
        nursery_id: Uuid,
        activity_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1 AND nursery_id = $2")
            .bind(activity_id)
            .bind(nursery_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Activity not found")));
        }

        info!(activity.id = %activity_id, "Activity deleted");
        Ok(())
    }
}
