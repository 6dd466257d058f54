//! Read-only directory of verified nurseries.
//!
//! A nursery is listed once an admin has verified it and its manager profile is
//! still of type `nursery_manager`.

use creche_core::{AppError, FileStorage};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::nurseries::service::{NURSERY_COLUMNS, NurseryService, public_url};
use crate::modules::nurseries::model::Nursery;
use crate::modules::public_nurseries::model::{
    NurseryBasic, PaginatedNurseryBasicResponse, PublicNurseryDetail, PublicNurseryFilterParams,
};

const PUBLIC_SCOPE: &str = "FROM nurseries n JOIN profiles p ON p.id = n.manager_id \
     WHERE n.verified AND p.user_type = 'nursery_manager'";

pub struct PublicNurseryService;

impl PublicNurseryService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "nurseries"))]
    pub async fn list_nurseries(
        db: &PgPool,
        filters: PublicNurseryFilterParams,
    ) -> Result<PaginatedNurseryBasicResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut where_clause = String::new();
        let mut text_params: Vec<String> = Vec::new();

        if let Some(name) = &filters.name {
            text_params.push(format!("%{}%", name));
            where_clause.push_str(&format!(" AND n.name ILIKE ${}", text_params.len()));
        }
        if let Some(address) = &filters.address {
            text_params.push(format!("{}%", address));
            where_clause.push_str(&format!(" AND n.address LIKE ${}", text_params.len()));
        }
        if filters.max_age.is_some() {
            where_clause.push_str(&format!(" AND n.max_age >= ${}", text_params.len() + 1));
        }

        let count_query = format!("SELECT COUNT(*) {}{}", PUBLIC_SCOPE, where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &text_params {
            count_sql = count_sql.bind(param);
        }
        if let Some(max_age) = filters.max_age {
            count_sql = count_sql.bind(max_age);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT n.id, n.name, n.address {}{} ORDER BY n.name, n.id LIMIT {} OFFSET {}",
            PUBLIC_SCOPE, where_clause, limit, offset
        );
        let mut data_sql = sqlx::query_as::<_, NurseryBasic>(&data_query);
        for param in &text_params {
            data_sql = data_sql.bind(param);
        }
        if let Some(max_age) = filters.max_age {
            data_sql = data_sql.bind(max_age);
        }
        let nurseries = data_sql.fetch_all(db).await?;

        Ok(PaginatedNurseryBasicResponse {
            data: nurseries,
            meta: filters.pagination.meta(total),
        })
    }

    /// Fails with 404 unless the nursery is publicly listed.
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "nurseries"))]
    pub async fn find_public_nursery(db: &PgPool, nursery_id: Uuid) -> Result<Nursery, AppError> {
        let query = format!("SELECT {} {} AND n.id = $1", NURSERY_COLUMNS, PUBLIC_SCOPE);

        sqlx::query_as::<_, Nursery>(&query)
            .bind(nursery_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Nursery not found")))
    }

    pub async fn get_nursery(
        db: &PgPool,
        storage: &dyn FileStorage,
        nursery_id: Uuid,
    ) -> Result<PublicNurseryDetail, AppError> {
        let nursery = Self::find_public_nursery(db, nursery_id).await?;
        let opening_hours = NurseryService::get_opening_hours(db, nursery.id).await?;

        Ok(PublicNurseryDetail {
            id: nursery.id,
            name: nursery.name,
            address: nursery.address,
            contact_number: nursery.contact_number,
            legal_status: nursery.legal_status,
            max_age: nursery.max_age,
            max_children_per_class: nursery.max_children_per_class,
            photo_exterior: public_url(storage, nursery.photo_exterior)?,
            photo_interior: public_url(storage, nursery.photo_interior)?,
            opening_hours,
            information: nursery.information,
        })
    }
}
