use creche_core::{AppError, PaginationParams};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::plans::model::{
    CreatePlanDto, DURATION_ORDER_SQL, PaginatedPlansResponse, Plan, UpdatePlanDto,
};

const PLAN_COLUMNS: &str =
    "id, nursery_id, name, description, price, duration, is_active, created_at, updated_at";

pub struct PlanService;

impl PlanService {
    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "plans"))]
    pub async fn create_plan(
        db: &PgPool,
        nursery_id: Uuid,
        dto: CreatePlanDto,
    ) -> Result<Plan, AppError> {
        let query = format!(
            r#"INSERT INTO plans (nursery_id, name, description, price, duration, is_active)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {}"#,
            PLAN_COLUMNS
        );

        let plan = sqlx::query_as::<_, Plan>(&query)
            .bind(nursery_id)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(dto.price)
            .bind(dto.duration.unwrap_or_default())
            .bind(dto.is_active.unwrap_or(true))
            .fetch_one(db)
            .await?;

        info!(plan.id = %plan.id, nursery.id = %nursery_id, "Plan created");
        Ok(plan)
    }

    /// Active plans of a nursery, shortest duration first.
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "plans"))]
    pub async fn list_active_plans(
        db: &PgPool,
        nursery_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<PaginatedPlansResponse, AppError> {
        let limit = pagination.limit();
        let offset = pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM plans WHERE nursery_id = $1 AND is_active",
        )
        .bind(nursery_id)
        .fetch_one(db)
        .await?;

        let query = format!(
            "SELECT {} FROM plans WHERE nursery_id = $1 AND is_active \
             ORDER BY {}, name, id LIMIT {} OFFSET {}",
            PLAN_COLUMNS, DURATION_ORDER_SQL, limit, offset
        );
        let plans = sqlx::query_as::<_, Plan>(&query)
            .bind(nursery_id)
            .fetch_all(db)
            .await?;

        Ok(PaginatedPlansResponse {
            data: plans,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "plans"))]
    pub async fn get_active_plan(
        db: &PgPool,
        nursery_id: Uuid,
        plan_id: Uuid,
    ) -> Result<Plan, AppError> {
        let query = format!(
            "SELECT {} FROM plans WHERE id = $1 AND nursery_id = $2 AND is_active",
            PLAN_COLUMNS
        );

        sqlx::query_as::<_, Plan>(&query)
            .bind(plan_id)
            .bind(nursery_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Plan not found")))
    }

    /// Any plan of the nursery, active or not.
    async fn find_plan(db: &PgPool, nursery_id: Uuid, plan_id: Uuid) -> Result<Plan, AppError> {
        let query = format!(
            "SELECT {} FROM plans WHERE id = $1 AND nursery_id = $2",
            PLAN_COLUMNS
        );

        sqlx::query_as::<_, Plan>(&query)
            .bind(plan_id)
            .bind(nursery_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Plan not found")))
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "plans"))]
    pub async fn update_plan(
        db: &PgPool,
        nursery_id: Uuid,
        plan_id: Uuid,
        dto: UpdatePlanDto,
    ) -> Result<Plan, AppError> {
        let existing = Self::find_plan(db, nursery_id, plan_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let description = dto.description.or(existing.description);
        let price = dto.price.unwrap_or(existing.price);
        let duration = dto.duration.unwrap_or(existing.duration);
        let is_active = dto.is_active.unwrap_or(existing.is_active);

        let query = format!(
            r#"UPDATE plans
               SET name = $1, description = $2, price = $3, duration = $4, is_active = $5,
                   updated_at = NOW()
               WHERE id = $6
               RETURNING {}"#,
            PLAN_COLUMNS
        );

        let plan = sqlx::query_as::<_, Plan>(&query)
            .bind(&name)
            .bind(&description)
            .bind(price)
            .bind(duration)
            .bind(is_active)
            .bind(plan_id)
            .fetch_one(db)
            .await?;

        Ok(plan)
    }

    /// Deleting a plan removes its subscriptions too.
    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "plans"))]
    pub async fn delete_plan(db: &PgPool, nursery_id: Uuid, plan_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1 AND nursery_id = $2")
            .bind(plan_id)
            .bind(nursery_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Plan not found")));
        }

        info!(plan.id = %plan_id, "Plan deleted");
        Ok(())
    }
}
