use creche_core::{AppError, PaginationParams};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::classrooms::service::assistants_by;
use crate::modules::groups::model::{
    CreateGroupDto, Group, GroupResponse, PaginatedGroupsResponse, UpdateGroupDto,
};
use crate::utils::db_errors::conflict_on_unique;

const GROUP_COLUMNS: &str = "id, classroom_id, name, active, created_at, updated_at";
const DUPLICATE_NAME: &str = "A group with this name already exists in this classroom";

pub struct GroupService;

impl GroupService {
    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "classroom_groups"))]
    pub async fn create_group(
        db: &PgPool,
        classroom_id: Uuid,
        dto: CreateGroupDto,
    ) -> Result<GroupResponse, AppError> {
        let query = format!(
            r#"INSERT INTO classroom_groups (classroom_id, name, active)
               VALUES ($1, $2, $3)
               RETURNING {}"#,
            GROUP_COLUMNS
        );

        let group = sqlx::query_as::<_, Group>(&query)
            .bind(classroom_id)
            .bind(&dto.name)
            .bind(dto.active.unwrap_or(true))
            .fetch_one(db)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))?;

        info!(group.id = %group.id, classroom.id = %classroom_id, "Group created");
        Ok(GroupResponse::new(group, Vec::new()))
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "classroom_groups"))]
    pub async fn list_groups(
        db: &PgPool,
        classroom_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<PaginatedGroupsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM classroom_groups WHERE classroom_id = $1",
        )
        .bind(classroom_id)
        .fetch_one(db)
        .await?;

        let query = format!(
            "SELECT {} FROM classroom_groups WHERE classroom_id = $1 ORDER BY name, id LIMIT {} OFFSET {}",
            GROUP_COLUMNS,
            pagination.limit(),
            pagination.offset()
        );
        let groups = sqlx::query_as::<_, Group>(&query)
            .bind(classroom_id)
            .fetch_all(db)
            .await?;

        let ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        let mut assistants = assistants_by(db, "group_id", &ids).await?;

        let data = groups
            .into_iter()
            .map(|g| {
                let assigned = assistants.remove(&g.id).unwrap_or_default();
                GroupResponse::new(g, assigned)
            })
            .collect();

        Ok(PaginatedGroupsResponse {
            data,
            meta: pagination.meta(total),
        })
    }

    async fn find_group(db: &PgPool, classroom_id: Uuid, group_id: Uuid) -> Result<Group, AppError> {
        let query = format!(
            "SELECT {} FROM classroom_groups WHERE id = $1 AND classroom_id = $2",
            GROUP_COLUMNS
        );

        sqlx::query_as::<_, Group>(&query)
            .bind(group_id)
            .bind(classroom_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Group not found")))
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "classroom_groups"))]
    pub async fn get_group(
        db: &PgPool,
        classroom_id: Uuid,
        group_id: Uuid,
    ) -> Result<GroupResponse, AppError> {
        let group = Self::find_group(db, classroom_id, group_id).await?;
        let assigned = assistants_by(db, "group_id", &[group.id])
            .await?
            .remove(&group.id)
            .unwrap_or_default();

        Ok(GroupResponse::new(group, assigned))
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "classroom_groups"))]
    pub async fn update_group(
        db: &PgPool,
        classroom_id: Uuid,
        group_id: Uuid,
        dto: UpdateGroupDto,
    ) -> Result<GroupResponse, AppError> {
        let existing = Self::find_group(db, classroom_id, group_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let active = dto.active.unwrap_or(existing.active);

        sqlx::query(
            "UPDATE classroom_groups SET name = $1, active = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(&name)
        .bind(active)
        .bind(group_id)
        .execute(db)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))?;

        Self::get_group(db, classroom_id, group_id).await
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "classroom_groups"))]
    pub async fn delete_group(
        db: &PgPool,
        classroom_id: Uuid,
        group_id: Uuid,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM classroom_groups WHERE id = $1 AND classroom_id = $2")
                .bind(group_id)
                .bind(classroom_id)
                .execute(db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Group not found")));
        }

        info!(group.id = %group_id, "Group deleted");
        Ok(())
    }
}
