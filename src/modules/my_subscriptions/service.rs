use creche_core::{AppError, PaginationParams};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::my_subscriptions::model::{
    MySubscriptionResponse, MySubscriptionRow, PaginatedMySubscriptionsResponse,
};
use crate::modules::subscriptions::service::details_for;

/// Subscriptions of `$1` on an active plan with at least one live child.
/// `EXISTS` keeps one row per subscription whatever the number of details.
const MINE: &str = r#"FROM subscriptions s
JOIN plans pl ON pl.id = s.plan_id
JOIN nurseries n ON n.id = pl.nursery_id
WHERE s.parent_id = $1
  AND pl.is_active
  AND EXISTS (
      SELECT 1 FROM subscription_details d
      JOIN children ch ON ch.id = d.child_id
      WHERE d.subscription_id = s.id AND ch.existe)"#;

const MINE_COLUMNS: &str = "s.id, s.start_date, s.end_date, s.price, s.is_active, s.created_at, \
     pl.id AS plan_id, pl.name AS plan_name, pl.duration AS plan_duration, \
     n.id AS nursery_id, n.name AS nursery_name";

pub struct MySubscriptionService;

impl MySubscriptionService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "subscriptions"))]
    pub async fn list(
        db: &PgPool,
        parent_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<PaginatedMySubscriptionsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) {}", MINE))
            .bind(parent_id)
            .fetch_one(db)
            .await?;

        let query = format!(
            "SELECT {} {} ORDER BY s.start_date DESC, s.created_at DESC LIMIT {} OFFSET {}",
            MINE_COLUMNS,
            MINE,
            pagination.limit(),
            pagination.offset()
        );
        let rows = sqlx::query_as::<_, MySubscriptionRow>(&query)
            .bind(parent_id)
            .fetch_all(db)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut details = details_for(db, &ids).await?;

        let data = rows
            .into_iter()
            .map(|row| {
                let objects = details.remove(&row.id).unwrap_or_default();
                MySubscriptionResponse::new(row, objects)
            })
            .collect();

        Ok(PaginatedMySubscriptionsResponse {
            data,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "subscriptions"))]
    pub async fn get(
        db: &PgPool,
        parent_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<MySubscriptionResponse, AppError> {
        let query = format!("SELECT {} {} AND s.id = $2", MINE_COLUMNS, MINE);

        let row = sqlx::query_as::<_, MySubscriptionRow>(&query)
            .bind(parent_id)
            .bind(subscription_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subscription not found")))?;

        let objects = details_for(db, &[row.id])
            .await?
            .remove(&row.id)
            .unwrap_or_default();
        Ok(MySubscriptionResponse::new(row, objects))
    }
}
