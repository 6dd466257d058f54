use std::collections::HashMap;

use creche_core::{AppError, PaginationParams};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::classrooms::model::{
    AssistantSummary, Classroom, ClassroomResponse, CreateClassroomDto,
    PaginatedClassroomsResponse, UpdateClassroomDto, check_classroom_bounds,
};
use crate::utils::db_errors::conflict_on_unique;

const CLASSROOM_COLUMNS: &str = "id, nursery_id, name, capacity, age_range_start, age_range_end, \
     nbr_children, existe, created_at, updated_at";

#[derive(Debug, FromRow)]
struct AssignedAssistant {
    owner_id: Uuid,
    id: Uuid,
    full_name: String,
    is_manager: bool,
}

/// Assistants grouped by the classroom or group they are assigned to.
///
/// `column` is either `classroom_id` or `group_id`.
pub(crate) async fn assistants_by(
    db: &PgPool,
    column: &'static str,
    owner_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<AssistantSummary>>, AppError> {
    let query = format!(
        r#"SELECT a.{column} AS owner_id, a.id,
                  TRIM(u.first_name || ' ' || u.last_name) AS full_name, a.is_manager
           FROM nursery_assistants a
           JOIN profiles p ON p.id = a.profile_id
           JOIN users u ON u.id = p.user_id
           WHERE a.{column} = ANY($1)
           ORDER BY full_name"#
    );

    let rows = sqlx::query_as::<_, AssignedAssistant>(&query)
        .bind(owner_ids)
        .fetch_all(db)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<AssistantSummary>> = HashMap::new();
    for row in rows {
        grouped.entry(row.owner_id).or_default().push(AssistantSummary {
            id: row.id,
            full_name: row.full_name,
            is_manager: row.is_manager,
        });
    }
    Ok(grouped)
}

pub struct ClassroomService;

impl ClassroomService {
    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "classrooms"))]
    pub async fn create_classroom(
        db: &PgPool,
        nursery_id: Uuid,
        dto: CreateClassroomDto,
    ) -> Result<ClassroomResponse, AppError> {
        let query = format!(
            r#"INSERT INTO classrooms (nursery_id, name, capacity, age_range_start, age_range_end,
                                       nbr_children, existe)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {}"#,
            CLASSROOM_COLUMNS
        );

        let classroom = sqlx::query_as::<_, Classroom>(&query)
            .bind(nursery_id)
            .bind(&dto.name)
            .bind(dto.capacity)
            .bind(dto.age_range_start)
            .bind(dto.age_range_end)
            .bind(dto.nbr_children.unwrap_or(0))
            .bind(dto.existe.unwrap_or(true))
            .fetch_one(db)
            .await
            .map_err(|e| {
                conflict_on_unique(e, "A classroom with this name already exists in this nursery")
            })?;

        info!(classroom.id = %classroom.id, nursery.id = %nursery_id, "Classroom created");
        Ok(ClassroomResponse::new(classroom, Vec::new()))
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "classrooms"))]
    pub async fn list_classrooms(
        db: &PgPool,
        nursery_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<PaginatedClassroomsResponse, AppError> {
        let limit = pagination.limit();
        let offset = pagination.offset();

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM classrooms WHERE nursery_id = $1")
                .bind(nursery_id)
                .fetch_one(db)
                .await?;

        let query = format!(
            "SELECT {} FROM classrooms WHERE nursery_id = $1 ORDER BY name, id LIMIT {} OFFSET {}",
            CLASSROOM_COLUMNS, limit, offset
        );
        let classrooms = sqlx::query_as::<_, Classroom>(&query)
            .bind(nursery_id)
            .fetch_all(db)
            .await?;

        let ids: Vec<Uuid> = classrooms.iter().map(|c| c.id).collect();
        let mut assistants = assistants_by(db, "classroom_id", &ids).await?;

        let data = classrooms
            .into_iter()
            .map(|c| {
                let assigned = assistants.remove(&c.id).unwrap_or_default();
                ClassroomResponse::new(c, assigned)
            })
            .collect();

        Ok(PaginatedClassroomsResponse {
            data,
            meta: pagination.meta(total),
        })
    }

    /// Loads a classroom, 404 unless it belongs to `nursery_id`.
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "classrooms"))]
    pub async fn find_classroom(
        db: &PgPool,
        nursery_id: Uuid,
        classroom_id: Uuid,
    ) -> Result<Classroom, AppError> {
        let query = format!(
            "SELECT {} FROM classrooms WHERE id = $1 AND nursery_id = $2",
            CLASSROOM_COLUMNS
        );

        sqlx::query_as::<_, Classroom>(&query)
            .bind(classroom_id)
            .bind(nursery_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Classroom not found")))
    }

    pub async fn get_classroom(
        db: &PgPool,
        nursery_id: Uuid,
        classroom_id: Uuid,
    ) -> Result<ClassroomResponse, AppError> {
        let classroom = Self::find_classroom(db, nursery_id, classroom_id).await?;
        let assigned = assistants_by(db, "classroom_id", &[classroom.id])
            .await?
            .remove(&classroom.id)
            .unwrap_or_default();

        Ok(ClassroomResponse::new(classroom, assigned))
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "classrooms"))]
    pub async fn update_classroom(
        db: &PgPool,
        nursery_id: Uuid,
        classroom_id: Uuid,
        dto: UpdateClassroomDto,
    ) -> Result<ClassroomResponse, AppError> {
        let existing = Self::find_classroom(db, nursery_id, classroom_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let capacity = dto.capacity.unwrap_or(existing.capacity);
        let age_range_start = dto.age_range_start.unwrap_or(existing.age_range_start);
        let age_range_end = dto.age_range_end.unwrap_or(existing.age_range_end);
        let nbr_children = dto.nbr_children.unwrap_or(existing.nbr_children);
        let existe = dto.existe.unwrap_or(existing.existe);

        check_classroom_bounds(age_range_start, age_range_end, nbr_children, capacity).map_err(
            |e| {
                AppError::unprocessable(anyhow::anyhow!(
                    "{}",
                    e.message.unwrap_or_else(|| "Invalid classroom".into())
                ))
            },
        )?;

        let query = format!(
            r#"UPDATE classrooms
               SET name = $1, capacity = $2, age_range_start = $3, age_range_end = $4,
                   nbr_children = $5, existe = $6, updated_at = NOW()
               WHERE id = $7
               RETURNING {}"#,
            CLASSROOM_COLUMNS
        );

        sqlx::query_as::<_, Classroom>(&query)
            .bind(&name)
            .bind(capacity)
            .bind(age_range_start)
            .bind(age_range_end)
            .bind(nbr_children)
            .bind(existe)
            .bind(classroom_id)
            .fetch_one(db)
            .await
            .map_err(|e| {
                conflict_on_unique(e, "A classroom with this name already exists in this nursery")
            })?;

        Self::get_classroom(db, nursery_id, classroom_id).await
    }

    /// Checks that `classroom_id` belongs to the nursery and `group_id` to that
    /// classroom (or to any classroom of the nursery when no classroom is given).
    /// Mismatches are 422.
    pub async fn check_placement<'e, E>(
        executor: E,
        nursery_id: Uuid,
        classroom_id: Option<Uuid>,
        group_id: Option<Uuid>,
    ) -> Result<(), AppError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        if classroom_id.is_none() && group_id.is_none() {
            return Ok(());
        }

        let (classroom_ok, group_ok) = sqlx::query_as::<_, (bool, bool)>(
            r#"SELECT
                 ($2::uuid IS NULL OR EXISTS (
                     SELECT 1 FROM classrooms WHERE id = $2 AND nursery_id = $1)),
                 ($3::uuid IS NULL OR EXISTS (
                     SELECT 1 FROM classroom_groups g
                     JOIN classrooms c ON c.id = g.classroom_id
                     WHERE g.id = $3 AND c.nursery_id = $1
                       AND ($2::uuid IS NULL OR g.classroom_id = $2)))"#,
        )
        .bind(nursery_id)
        .bind(classroom_id)
        .bind(group_id)
        .fetch_one(executor)
        .await?;

        if !classroom_ok {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "classroom_id does not belong to this nursery"
            )));
        }
        if !group_ok {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "group_id does not belong to the given classroom"
            )));
        }
        Ok(())
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "classrooms"))]
    pub async fn delete_classroom(
        db: &PgPool,
        nursery_id: Uuid,
        classroom_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM classrooms WHERE id = $1 AND nursery_id = $2")
            .bind(classroom_id)
            .bind(nursery_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Classroom not found")));
        }

        info!(classroom.id = %classroom_id, "Classroom deleted");
        Ok(())
    }
}
