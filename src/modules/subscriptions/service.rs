//! Parent subscriptions to a nursery plan.
//!
//! A subscription carries one detail row per child, optionally placed in a
//! classroom and group of the plan's nursery. Writes touching details run in a
//! single transaction.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use creche_core::{AppError, PaginationParams};
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::metrics::track_subscription_created;
use crate::modules::classrooms::service::ClassroomService;
use crate::modules::plans::service::PlanService;
use crate::modules::subscriptions::model::{
    CreateSubscriptionDto, DetailObject, DetailRow, PaginatedSubscriptionsResponse, Plan,
    Subscription, SubscriptionDetailDto, SubscriptionResponse, UpdateSubscriptionDto,
    check_period,
};

const SUBSCRIPTION_COLUMNS: &str =
    "id, parent_id, plan_id, start_date, end_date, price, is_active, created_at, updated_at";

/// Detail objects keyed by subscription id.
pub(crate) async fn details_for(
    db: &PgPool,
    subscription_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<DetailObject>>, AppError> {
    let rows = sqlx::query_as::<_, DetailRow>(
        r#"SELECT d.id, d.subscription_id, d.child_id,
                  ch.first_name AS child_first_name, ch.last_name AS child_last_name,
                  ch.birthday AS child_birthday,
                  d.classroom_id, c.name AS classroom_name,
                  d.group_id, g.name AS group_name
           FROM subscription_details d
           JOIN children ch ON ch.id = d.child_id
           LEFT JOIN classrooms c ON c.id = d.classroom_id
           LEFT JOIN classroom_groups g ON g.id = d.group_id
           WHERE d.subscription_id = ANY($1)
           ORDER BY ch.last_name, ch.first_name"#,
    )
    .bind(subscription_ids)
    .fetch_all(db)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<DetailObject>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.subscription_id)
            .or_default()
            .push(DetailObject::from(row));
    }
    Ok(grouped)
}

fn period_error(e: validator::ValidationError) -> AppError {
    AppError::unprocessable(anyhow::anyhow!(
        "{}",
        e.message.unwrap_or_else(|| "Invalid period".into())
    ))
}

pub struct SubscriptionService;

impl SubscriptionService {
    #[instrument(
        skip(db, plan, dto),
        fields(db.operation = "INSERT", db.table = "subscriptions", plan.id = %plan.id)
    )]
    pub async fn create_subscription(
        db: &PgPool,
        plan: &Plan,
        parent_id: Uuid,
        dto: CreateSubscriptionDto,
    ) -> Result<SubscriptionResponse, AppError> {
        let start_date = dto.start_date.unwrap_or_else(|| Utc::now().date_naive());
        let end_date = dto.end_date.or_else(|| plan.duration.end_date(start_date));
        check_period(start_date, end_date).map_err(period_error)?;

        let mut tx = db.begin().await?;

        Self::check_details(&mut tx, plan.nursery_id, parent_id, &dto.details).await?;

        let query = format!(
            r#"INSERT INTO subscriptions (parent_id, plan_id, start_date, end_date, price, is_active)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {}"#,
            SUBSCRIPTION_COLUMNS
        );
        let subscription = sqlx::query_as::<_, Subscription>(&query)
            .bind(parent_id)
            .bind(plan.id)
            .bind(start_date)
            .bind(end_date)
            .bind(plan.price)
            .bind(dto.is_active.unwrap_or(true))
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_details(&mut tx, subscription.id, &dto.details).await?;
        tx.commit().await?;

        track_subscription_created();
        info!(
            subscription.id = %subscription.id,
            children = dto.details.len(),
            "Subscription created"
        );

        Self::render_one(db, subscription).await
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "subscriptions"))]
    pub async fn list_subscriptions(
        db: &PgPool,
        parent_id: Uuid,
        plan_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<PaginatedSubscriptionsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM subscriptions WHERE parent_id = $1 AND plan_id = $2",
        )
        .bind(parent_id)
        .bind(plan_id)
        .fetch_one(db)
        .await?;

        let query = format!(
            r#"SELECT {} FROM subscriptions
               WHERE parent_id = $1 AND plan_id = $2
               ORDER BY start_date DESC, created_at DESC
               LIMIT {} OFFSET {}"#,
            SUBSCRIPTION_COLUMNS,
            pagination.limit(),
            pagination.offset()
        );
        let subscriptions = sqlx::query_as::<_, Subscription>(&query)
            .bind(parent_id)
            .bind(plan_id)
            .fetch_all(db)
            .await?;

        let ids: Vec<Uuid> = subscriptions.iter().map(|s| s.id).collect();
        let mut details = details_for(db, &ids).await?;

        let data = subscriptions
            .into_iter()
            .map(|s| {
                let objects = details.remove(&s.id).unwrap_or_default();
                SubscriptionResponse::new(s, objects)
            })
            .collect();

        Ok(PaginatedSubscriptionsResponse {
            data,
            meta: pagination.meta(total),
        })
    }

    /// The caller's subscription on `plan_id`, 404 otherwise.
    async fn find_subscription(
        db: &PgPool,
        parent_id: Uuid,
        plan_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<Subscription, AppError> {
        let query = format!(
            "SELECT {} FROM subscriptions WHERE id = $1 AND parent_id = $2 AND plan_id = $3",
            SUBSCRIPTION_COLUMNS
        );

        sqlx::query_as::<_, Subscription>(&query)
            .bind(subscription_id)
            .bind(parent_id)
            .bind(plan_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subscription not found")))
    }

    pub async fn get_subscription(
        db: &PgPool,
        parent_id: Uuid,
        plan_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<SubscriptionResponse, AppError> {
        let subscription = Self::find_subscription(db, parent_id, plan_id, subscription_id).await?;
        Self::render_one(db, subscription).await
    }

    /// Updates the period, status and plan. `details`, when given, replace the
    /// existing ones. Moving to another plan copies that plan's price.
    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "subscriptions"))]
    pub async fn update_subscription(
        db: &PgPool,
        plan: &Plan,
        parent_id: Uuid,
        subscription_id: Uuid,
        dto: UpdateSubscriptionDto,
    ) -> Result<SubscriptionResponse, AppError> {
        let existing = Self::find_subscription(db, parent_id, plan.id, subscription_id).await?;

        let (plan_id, price) = match dto.plan_id {
            Some(new_plan_id) => {
                let target = PlanService::get_active_plan(db, plan.nursery_id, new_plan_id)
                    .await
                    .map_err(|_| {
                        AppError::unprocessable(anyhow::anyhow!(
                            "plan_id is not an active plan of this nursery"
                        ))
                    })?;
                (target.id, target.price)
            }
            None => (existing.plan_id, existing.price),
        };

        let start_date: NaiveDate = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.or(existing.end_date);
        let is_active = dto.is_active.unwrap_or(existing.is_active);
        check_period(start_date, end_date).map_err(period_error)?;

        let mut tx = db.begin().await?;

        let query = format!(
            r#"UPDATE subscriptions
               SET plan_id = $1, start_date = $2, end_date = $3, price = $4, is_active = $5,
                   updated_at = NOW()
               WHERE id = $6
               RETURNING {}"#,
            SUBSCRIPTION_COLUMNS
        );
        let subscription = sqlx::query_as::<_, Subscription>(&query)
            .bind(plan_id)
            .bind(start_date)
            .bind(end_date)
            .bind(price)
            .bind(is_active)
            .bind(subscription_id)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(details) = &dto.details {
            Self::check_details(&mut tx, plan.nursery_id, parent_id, details).await?;
            sqlx::query("DELETE FROM subscription_details WHERE subscription_id = $1")
                .bind(subscription_id)
                .execute(&mut *tx)
                .await?;
            Self::insert_details(&mut tx, subscription_id, details).await?;
        }

        tx.commit().await?;

        info!(subscription.id = %subscription_id, plan.id = %plan_id, "Subscription updated");
        Self::render_one(db, subscription).await
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "subscriptions"))]
    pub async fn delete_subscription(
        db: &PgPool,
        parent_id: Uuid,
        plan_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM subscriptions WHERE id = $1 AND parent_id = $2 AND plan_id = $3",
        )
        .bind(subscription_id)
        .bind(parent_id)
        .bind(plan_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Subscription not found")));
        }

        info!(subscription.id = %subscription_id, "Subscription deleted");
        Ok(())
    }

    /// Every child must be a live child of the parent, and each placement must
    /// fit inside the nursery.
    async fn check_details(
        conn: &mut PgConnection,
        nursery_id: Uuid,
        parent_id: Uuid,
        details: &[SubscriptionDetailDto],
    ) -> Result<(), AppError> {
        let child_ids: Vec<Uuid> = details.iter().map(|d| d.child_id).collect();

        let owned = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM children WHERE id = ANY($1) AND parent_id = $2 AND existe",
        )
        .bind(&child_ids)
        .bind(parent_id)
        .fetch_one(&mut *conn)
        .await?;

        if owned != child_ids.len() as i64 {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Every child must be one of your registered children"
            )));
        }

        for detail in details {
            ClassroomService::check_placement(
                &mut *conn,
                nursery_id,
                detail.classroom_id,
                detail.group_id,
            )
            .await?;
        }
        Ok(())
    }

    async fn insert_details(
        conn: &mut PgConnection,
        subscription_id: Uuid,
        details: &[SubscriptionDetailDto],
    ) -> Result<(), AppError> {
        for detail in details {
            sqlx::query(
                r#"INSERT INTO subscription_details (subscription_id, child_id, classroom_id, group_id)
                   VALUES ($1, $2, $3, $4)"#,
            )
            .bind(subscription_id)
            .bind(detail.child_id)
            .bind(detail.classroom_id)
            .bind(detail.group_id)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    async fn render_one(
        db: &PgPool,
        subscription: Subscription,
    ) -> Result<SubscriptionResponse, AppError> {
        let objects = details_for(db, &[subscription.id])
            .await?
            .remove(&subscription.id)
            .unwrap_or_default();
        Ok(SubscriptionResponse::new(subscription, objects))
    }
}
