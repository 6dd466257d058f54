//! Nursery persistence, document storage and response rendering.
//!
//! Document columns store storage keys. [`NurseryService::render`] turns them
//! into public URLs and attaches the manager summary and opening hours, loading
//! both in one query each for a whole page of nurseries.

use std::collections::HashMap;

use chrono::Utc;
use creche_core::{AppError, FileStorage, StorageError};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::metrics;
use crate::modules::nurseries::model::{
    CreateNurseryDto, DocumentKind, ManagerSummary, Nursery, NurseryFilterParams,
    NurseryResponse, OpeningHour, OpeningHourDto, PaginatedNurseriesResponse, UpdateNurseryDto,
};
use crate::utils::db_errors::conflict_on_unique;

pub(crate) const NURSERY_COLUMNS: &str = "n.id, n.upload_folder, n.manager_id, n.name, \
     n.address, n.contact_number, n.information, n.max_age, n.max_children_per_class, \
     n.legal_status, n.agreement_document, n.id_card_document, n.photo_exterior, \
     n.photo_interior, n.verified, n.online, n.created_at, n.updated_at";

pub struct NurseryService;

impl NurseryService {
    #[instrument(skip(db, storage, dto), fields(db.operation = "INSERT", db.table = "nurseries"))]
    pub async fn create_nursery(
        db: &PgPool,
        storage: &dyn FileStorage,
        manager_id: Uuid,
        dto: CreateNurseryDto,
    ) -> Result<NurseryResponse, AppError> {
        let query = format!(
            r#"INSERT INTO nurseries AS n (manager_id, name, address, contact_number, information,
                                         max_age, max_children_per_class, legal_status, online)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {}"#,
            NURSERY_COLUMNS
        );

        let nursery = sqlx::query_as::<_, Nursery>(&query)
            .bind(manager_id)
            .bind(&dto.name)
            .bind(&dto.address)
            .bind(&dto.contact_number)
            .bind(&dto.information)
            .bind(dto.max_age)
            .bind(dto.max_children_per_class)
            .bind(dto.legal_status.unwrap_or_default())
            .bind(dto.online.unwrap_or(false))
            .fetch_one(db)
            .await
            .map_err(|e| conflict_on_unique(e, "This manager already has a nursery"))?;

        metrics::track_nursery_created();
        info!(nursery.id = %nursery.id, manager.id = %manager_id, "Nursery created");
        Self::render_one(db, storage, nursery).await
    }

    /// Lists nurseries ordered by name. `manager_id = None` lists every nursery.
    #[instrument(skip(db, storage), fields(db.operation = "SELECT", db.table = "nurseries"))]
    pub async fn list_nurseries(
        db: &PgPool,
        storage: &dyn FileStorage,
        manager_id: Option<Uuid>,
        filters: NurseryFilterParams,
    ) -> Result<PaginatedNurseriesResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut where_clause = String::from(" WHERE 1=1");
        let mut param_count = 0;

        if manager_id.is_some() {
            param_count += 1;
            where_clause.push_str(&format!(" AND n.manager_id = ${}", param_count));
        }
        if filters.name.is_some() {
            param_count += 1;
            where_clause.push_str(&format!(" AND n.name ILIKE ${}", param_count));
        }

        let count_query = format!("SELECT COUNT(*) FROM nurseries n{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(manager_id) = manager_id {
            count_sql = count_sql.bind(manager_id);
        }
        if let Some(name) = &filters.name {
            count_sql = count_sql.bind(format!("%{}%", name));
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT {} FROM nurseries n{} ORDER BY n.name, n.id LIMIT {} OFFSET {}",
            NURSERY_COLUMNS, where_clause, limit, offset
        );
        let mut data_sql = sqlx::query_as::<_, Nursery>(&data_query);
        if let Some(manager_id) = manager_id {
            data_sql = data_sql.bind(manager_id);
        }
        if let Some(name) = &filters.name {
            data_sql = data_sql.bind(format!("%{}%", name));
        }
        let nurseries = data_sql.fetch_all(db).await?;

        Ok(PaginatedNurseriesResponse {
            data: Self::render(db, storage, nurseries).await?,
            meta: filters.pagination.meta(total),
        })
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "nurseries"))]
    pub async fn find_nursery(db: &PgPool, nursery_id: Uuid) -> Result<Nursery, AppError> {
        let query = format!("SELECT {} FROM nurseries n WHERE n.id = $1", NURSERY_COLUMNS);

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
    ) -> Result<NurseryResponse, AppError> {
        let nursery = Self::find_nursery(db, nursery_id).await?;
        Self::render_one(db, storage, nursery).await
    }

    #[instrument(skip(db, storage, dto), fields(db.operation = "UPDATE", db.table = "nurseries"))]
    pub async fn update_nursery(
        db: &PgPool,
        storage: &dyn FileStorage,
        nursery_id: Uuid,
        dto: UpdateNurseryDto,
    ) -> Result<NurseryResponse, AppError> {
        let existing = Self::find_nursery(db, nursery_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let address = dto.address.unwrap_or(existing.address);
        let contact_number = dto.contact_number.unwrap_or(existing.contact_number);
        let information = dto.information.or(existing.information);
        let max_age = dto.max_age.unwrap_or(existing.max_age);
        let max_children_per_class = dto
            .max_children_per_class
            .unwrap_or(existing.max_children_per_class);
        let legal_status = dto.legal_status.unwrap_or(existing.legal_status);
        let online = dto.online.unwrap_or(existing.online);

        let query = format!(
            r#"UPDATE nurseries AS n
               SET name = $1, address = $2, contact_number = $3, information = $4,
                   max_age = $5, max_children_per_class = $6, legal_status = $7, online = $8,
                   updated_at = NOW()
               WHERE n.id = $9
               RETURNING {}"#,
            NURSERY_COLUMNS
        );

        let nursery = sqlx::query_as::<_, Nursery>(&query)
            .bind(&name)
            .bind(&address)
            .bind(&contact_number)
            .bind(&information)
            .bind(max_age)
            .bind(max_children_per_class)
            .bind(legal_status)
            .bind(online)
            .bind(nursery_id)
            .fetch_one(db)
            .await?;

        Self::render_one(db, storage, nursery).await
    }

    #[instrument(skip(db, storage), fields(db.operation = "UPDATE", db.table = "nurseries"))]
    pub async fn set_verified(
        db: &PgPool,
        storage: &dyn FileStorage,
        nursery_id: Uuid,
        verified: bool,
    ) -> Result<NurseryResponse, AppError> {
        let query = format!(
            "UPDATE nurseries AS n SET verified = $1, updated_at = NOW() WHERE n.id = $2 RETURNING {}",
            NURSERY_COLUMNS
        );

        let nursery = sqlx::query_as::<_, Nursery>(&query)
            .bind(verified)
            .bind(nursery_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Nursery not found")))?;

        info!(nursery.id = %nursery_id, verified, "Nursery verification changed");
        Self::render_one(db, storage, nursery).await
    }

    /// Deletes the nursery (cascading to everything nested) and its stored files.
    #[instrument(skip(db, storage), fields(db.operation = "DELETE", db.table = "nurseries"))]
    pub async fn delete_nursery(
        db: &PgPool,
        storage: &dyn FileStorage,
        nursery_id: Uuid,
    ) -> Result<(), AppError> {
        let nursery = Self::find_nursery(db, nursery_id).await?;

        sqlx::query("DELETE FROM nurseries WHERE id = $1")
            .bind(nursery_id)
            .execute(db)
            .await?;

        for kind in [
            DocumentKind::AgreementDocument,
            DocumentKind::IdCardDocument,
            DocumentKind::PhotoExterior,
            DocumentKind::PhotoInterior,
        ] {
            if let Some(key) = nursery.document(kind)
                && let Err(e) = storage.delete(key).await
            {
                warn!(storage.key = %key, error = %e, "Failed to remove nursery file");
            }
        }

        info!(nursery.id = %nursery_id, "Nursery deleted");
        Ok(())
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "opening_hours"))]
    pub async fn get_opening_hours(
        db: &PgPool,
        nursery_id: Uuid,
    ) -> Result<Vec<OpeningHour>, AppError> {
        let hours = sqlx::query_as::<_, OpeningHour>(
            r#"SELECT id, nursery_id, day, open_time, close_time, is_closed
               FROM opening_hours WHERE nursery_id = $1 ORDER BY day"#,
        )
        .bind(nursery_id)
        .fetch_all(db)
        .await?;

        Ok(hours)
    }

    /// Replaces the whole weekly schedule atomically.
    #[instrument(skip(db, hours), fields(db.operation = "REPLACE", db.table = "opening_hours", slots = hours.len()))]
    pub async fn replace_opening_hours(
        db: &PgPool,
        nursery_id: Uuid,
        hours: Vec<OpeningHourDto>,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM opening_hours WHERE nursery_id = $1")
            .bind(nursery_id)
            .execute(&mut *tx)
            .await?;

        for hour in &hours {
            let (open_time, close_time) = if hour.is_closed {
                (None, None)
            } else {
                (hour.open_time, hour.close_time)
            };

            sqlx::query(
                r#"INSERT INTO opening_hours (nursery_id, day, open_time, close_time, is_closed)
                   VALUES ($1, $2, $3, $4, $5)"#,
            )
            .bind(nursery_id)
            .bind(hour.day)
            .bind(open_time)
            .bind(close_time)
            .bind(hour.is_closed)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(nursery.id = %nursery_id, "Opening hours replaced");
        Ok(())
    }

    /// Stores an uploaded file for `kind`, replacing and removing any previous one.
    #[instrument(skip(db, storage, nursery, content), fields(nursery.id = %nursery.id, bytes = content.len()))]
    pub async fn upload_document(
        db: &PgPool,
        storage: &dyn FileStorage,
        nursery: Nursery,
        kind: DocumentKind,
        content_type: &str,
        content: &[u8],
    ) -> Result<NurseryResponse, AppError> {
        let extension = kind.extension_for(content_type).ok_or_else(|| {
            AppError::unprocessable(anyhow::anyhow!(
                "Unsupported file type '{}' for {}",
                content_type,
                kind
            ))
        })?;

        let key = kind.storage_key(
            nursery.upload_folder,
            Utc::now().timestamp_millis(),
            extension,
        );
        storage.save(&key, content).await.map_err(storage_error)?;

        // column name comes from a closed enum
        let query = format!(
            "UPDATE nurseries AS n SET {} = $1, updated_at = NOW() WHERE n.id = $2 RETURNING {}",
            kind.as_str(),
            NURSERY_COLUMNS
        );
        let updated = sqlx::query_as::<_, Nursery>(&query)
            .bind(&key)
            .bind(nursery.id)
            .fetch_one(db)
            .await?;

        if let Some(previous) = nursery.document(kind)
            && previous != key
            && let Err(e) = storage.delete(previous).await
        {
            warn!(storage.key = %previous, error = %e, "Failed to remove replaced file");
        }

        info!(document.kind = %kind, storage.key = %key, "Nursery document uploaded");
        Self::render_one(db, storage, updated).await
    }

    pub async fn render_one(
        db: &PgPool,
        storage: &dyn FileStorage,
        nursery: Nursery,
    ) -> Result<NurseryResponse, AppError> {
        Self::render(db, storage, vec![nursery])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal_error("Nursery rendering produced no row".to_string()))
    }

    /// Builds responses for a batch of nurseries, preserving order.
    pub async fn render(
        db: &PgPool,
        storage: &dyn FileStorage,
        nurseries: Vec<Nursery>,
    ) -> Result<Vec<NurseryResponse>, AppError> {
        if nurseries.is_empty() {
            return Ok(Vec::new());
        }

        let manager_ids: Vec<Uuid> = nurseries.iter().map(|n| n.manager_id).collect();
        let nursery_ids: Vec<Uuid> = nurseries.iter().map(|n| n.id).collect();

        let managers: HashMap<Uuid, ManagerSummary> = sqlx::query_as::<_, ManagerSummary>(
            r#"SELECT p.id, p.user_id, u.username, u.email,
                      TRIM(u.first_name || ' ' || u.last_name) AS full_name
               FROM profiles p
               JOIN users u ON u.id = p.user_id
               WHERE p.id = ANY($1)"#,
        )
        .bind(&manager_ids)
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

        let mut hours: HashMap<Uuid, Vec<OpeningHour>> = HashMap::new();
        let rows = sqlx::query_as::<_, OpeningHour>(
            r#"SELECT id, nursery_id, day, open_time, close_time, is_closed
               FROM opening_hours WHERE nursery_id = ANY($1) ORDER BY nursery_id, day"#,
        )
        .bind(&nursery_ids)
        .fetch_all(db)
        .await?;
        for hour in rows {
            hours.entry(hour.nursery_id).or_default().push(hour);
        }

        nurseries
            .into_iter()
            .map(|nursery| {
                let manager = managers.get(&nursery.manager_id).cloned().ok_or_else(|| {
                    AppError::internal_error(format!(
                        "Manager profile {} missing for nursery {}",
                        nursery.manager_id, nursery.id
                    ))
                })?;
                let opening_hours = hours.remove(&nursery.id).unwrap_or_default();

                Ok(NurseryResponse {
                    id: nursery.id,
                    upload_folder: nursery.upload_folder,
                    manager,
                    name: nursery.name,
                    address: nursery.address,
                    contact_number: nursery.contact_number,
                    information: nursery.information,
                    max_age: nursery.max_age,
                    max_children_per_class: nursery.max_children_per_class,
                    legal_status: nursery.legal_status,
                    agreement_document: public_url(storage, nursery.agreement_document)?,
                    id_card_document: public_url(storage, nursery.id_card_document)?,
                    photo_exterior: public_url(storage, nursery.photo_exterior)?,
                    photo_interior: public_url(storage, nursery.photo_interior)?,
                    verified: nursery.verified,
                    online: nursery.online,
                    opening_hours,
                    created_at: nursery.created_at,
                    updated_at: nursery.updated_at,
                })
            })
            .collect()
    }
}

pub(crate) fn public_url(
    storage: &dyn FileStorage,
    key: Option<String>,
) -> Result<Option<String>, AppError> {
    key.map(|k| storage.url(&k).map_err(storage_error))
        .transpose()
}

fn storage_error(e: StorageError) -> AppError {
    match e {
        StorageError::TooLarge { .. } => AppError::new(
            axum::http::StatusCode::PAYLOAD_TOO_LARGE,
            anyhow::anyhow!("{}", e),
        ),
        StorageError::InvalidKey(_) => AppError::bad_request(anyhow::anyhow!("{}", e)),
        StorageError::Io(_) => {
            tracing::error!(error = %e, "File storage failure");
            AppError::internal(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creche_core::LocalFileStorage;

    fn storage() -> LocalFileStorage {
        LocalFileStorage::new(
            std::env::temp_dir(),
            "http://localhost:3000/files".to_string(),
            1024,
        )
    }

    #[test]
    fn test_public_url_renders_stored_key() {
        let url = public_url(&storage(), Some("nurseries/a/doc/agreement_document-1.pdf".into()))
            .unwrap();
        assert_eq!(
            url.as_deref(),
            Some("http://localhost:3000/files/nurseries/a/doc/agreement_document-1.pdf")
        );
    }

    #[test]
    fn test_public_url_passes_through_missing_file() {
        assert_eq!(public_url(&storage(), None).unwrap(), None);
    }

    #[test]
    fn test_storage_errors_map_to_http_statuses() {
        let too_large = storage_error(StorageError::TooLarge { max_bytes: 10 });
        assert_eq!(too_large.status, axum::http::StatusCode::PAYLOAD_TOO_LARGE);

        let invalid = storage_error(StorageError::InvalidKey("..".into()));
        assert_eq!(invalid.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
