//! Nursery assistants.
//!
//! An assistant is a regular account of type `nursery_assistant` plus one
//! `nursery_assistants` row tying its profile to a nursery, optionally to a
//! classroom and group. Creating one writes all three rows in a transaction.

use creche_core::AppError;
use sqlx::{PgExecutor, PgPool};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::assistants::model::{
    AssistantFilterParams, AssistantResponse, AssistantRow, CreateAssistantDto,
    PaginatedAssistantsResponse, UpdateAssistantDto,
};
use crate::modules::classrooms::service::ClassroomService;
use crate::modules::users::model::UserType;
use crate::modules::users::service::{ProfileFields, UserService};
use crate::utils::db_errors::conflict_on_unique;

const ASSISTANT_SELECT: &str = r#"SELECT a.id, a.nursery_id, a.classroom_id, a.group_id,
           a.is_manager, a.active, a.created_at,
           p.id AS profile_id, p.user_id, u.username, u.email, u.first_name, u.last_name,
           u.is_staff, p.contact, p.address, p.birthday, p.user_type,
           p.created_at AS profile_created_at
    FROM nursery_assistants a
    JOIN profiles p ON p.id = a.profile_id
    JOIN users u ON u.id = p.user_id"#;

pub struct AssistantService;

impl AssistantService {
    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "nursery_assistants"))]
    pub async fn create_assistant(
        db: &PgPool,
        nursery_id: Uuid,
        dto: CreateAssistantDto,
    ) -> Result<AssistantResponse, AppError> {
        let mut tx = db.begin().await?;

        ClassroomService::check_placement(&mut *tx, nursery_id, dto.classroom_id, dto.group_id)
            .await?;

        let fields = ProfileFields {
            contact: dto.profile.contact,
            address: dto.profile.address,
            birthday: dto.profile.birthday,
        };
        let profile_id = UserService::insert_account(
            &mut tx,
            &dto.profile.user,
            fields,
            UserType::NurseryAssistant,
            false,
        )
        .await?;

        let assistant_id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO nursery_assistants (profile_id, nursery_id, classroom_id, group_id, is_manager)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(profile_id)
        .bind(nursery_id)
        .bind(dto.classroom_id)
        .bind(dto.group_id)
        .bind(dto.is_manager.unwrap_or(false))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "This profile is already an assistant of this nursery"))?;

        let assistant = Self::fetch(&mut *tx, nursery_id, assistant_id).await?;
        tx.commit().await?;

        info!(assistant.id = %assistant_id, nursery.id = %nursery_id, "Assistant created");
        Ok(assistant)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "nursery_assistants"))]
    pub async fn list_assistants(
        db: &PgPool,
        nursery_id: Uuid,
        filters: AssistantFilterParams,
    ) -> Result<PaginatedAssistantsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut where_clause = String::from(" WHERE a.nursery_id = $1");
        if filters.classroom_id.is_some() {
            where_clause.push_str(" AND a.classroom_id = $2");
        }

        let count_query = format!("SELECT COUNT(*) FROM nursery_assistants a{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query).bind(nursery_id);
        if let Some(classroom_id) = filters.classroom_id {
            count_sql = count_sql.bind(classroom_id);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "{}{} ORDER BY u.last_name, u.first_name, a.id LIMIT {} OFFSET {}",
            ASSISTANT_SELECT, where_clause, limit, offset
        );
        let mut data_sql = sqlx::query_as::<_, AssistantRow>(&data_query).bind(nursery_id);
        if let Some(classroom_id) = filters.classroom_id {
            data_sql = data_sql.bind(classroom_id);
        }
        let rows = data_sql.fetch_all(db).await?;

        Ok(PaginatedAssistantsResponse {
            data: rows.into_iter().map(AssistantResponse::from).collect(),
            meta: filters.pagination.meta(total),
        })
    }

    async fn fetch<'e, E>(
        executor: E,
        nursery_id: Uuid,
        assistant_id: Uuid,
    ) -> Result<AssistantResponse, AppError>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("{} WHERE a.id = $1 AND a.nursery_id = $2", ASSISTANT_SELECT);

        let row = sqlx::query_as::<_, AssistantRow>(&query)
            .bind(assistant_id)
            .bind(nursery_id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Assistant not found")))?;

        Ok(row.into())
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "nursery_assistants"))]
    pub async fn get_assistant(
        db: &PgPool,
        nursery_id: Uuid,
        assistant_id: Uuid,
    ) -> Result<AssistantResponse, AppError> {
        Self::fetch(db, nursery_id, assistant_id).await
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "nursery_assistants"))]
    pub async fn update_assistant(
        db: &PgPool,
        nursery_id: Uuid,
        assistant_id: Uuid,
        dto: UpdateAssistantDto,
    ) -> Result<AssistantResponse, AppError> {
        let existing = Self::fetch(db, nursery_id, assistant_id).await?;

        let classroom_id = dto.classroom_id.or(existing.classroom_id);
        let group_id = placement_group(existing.classroom_id, existing.group_id, &dto);
        let is_manager = dto.is_manager.unwrap_or(existing.is_manager);
        let active = dto.active.unwrap_or(existing.active);

        ClassroomService::check_placement(db, nursery_id, classroom_id, group_id).await?;

        sqlx::query(
            r#"UPDATE nursery_assistants
               SET classroom_id = $1, group_id = $2, is_manager = $3, active = $4, updated_at = NOW()
               WHERE id = $5"#,
        )
        .bind(classroom_id)
        .bind(group_id)
        .bind(is_manager)
        .bind(active)
        .bind(assistant_id)
        .execute(db)
        .await?;

        Self::fetch(db, nursery_id, assistant_id).await
    }

    /// Removes the assignment only; the assistant's account stays.
    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "nursery_assistants"))]
    pub async fn delete_assistant(
        db: &PgPool,
        nursery_id: Uuid,
        assistant_id: Uuid,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM nursery_assistants WHERE id = $1 AND nursery_id = $2")
                .bind(assistant_id)
                .bind(nursery_id)
                .execute(db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Assistant not found")));
        }

        info!(assistant.id = %assistant_id, "Assistant removed");
        Ok(())
    }
}

/// A group belongs to one classroom, so moving classrooms without naming a
/// new group drops the old one.
fn placement_group(
    current_classroom: Option<Uuid>,
    current_group: Option<Uuid>,
    dto: &UpdateAssistantDto,
) -> Option<Uuid> {
    match (dto.classroom_id, dto.group_id) {
        (_, Some(group_id)) => Some(group_id),
        (Some(classroom_id), None) if Some(classroom_id) != current_classroom => None,
        _ => current_group,
    }
}
