use chrono::Utc;
use creche_core::{AppError, PaginationParams};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::metrics::track_child_registered;
use crate::modules::children::model::{
    ChildResponse, ChildRow, CreateChildDto, PaginatedChildrenResponse, UpdateChildDto,
};

const CHILD_SELECT: &str = r#"SELECT c.id, c.parent_id, c.last_name, c.first_name, c.birthday,
       c.joined_date, c.detail, c.existe, c.created_at, c.updated_at,
       u.id AS parent_user_id, u.username AS parent_username,
       u.first_name AS parent_first_name, u.last_name AS parent_last_name,
       u.email AS parent_email, p.contact AS parent_contact
FROM children c
JOIN profiles p ON p.id = c.parent_id
JOIN users u ON u.id = p.user_id"#;

/// Which children a caller is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildScope {
    All,
    /// Live children of this parent profile
    Parent(Uuid),
    Nothing,
}

impl ChildScope {
    /// SQL predicate on `c` with the parent id bound as `$1` when needed.
    fn predicate(&self) -> &'static str {
        match self {
            Self::All => "TRUE",
            Self::Parent(_) => "c.parent_id = $1 AND c.existe",
            Self::Nothing => "FALSE",
        }
    }

    fn parent_id(&self) -> Option<Uuid> {
        match self {
            Self::Parent(id) => Some(*id),
            _ => None,
        }
    }
}

pub struct ChildService;

impl ChildService {
    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "children"))]
    pub async fn create_child(
        db: &PgPool,
        parent_id: Uuid,
        dto: CreateChildDto,
    ) -> Result<ChildResponse, AppError> {
        let joined_date = dto.joined_date.unwrap_or_else(|| Utc::now().date_naive());

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO children (parent_id, last_name, first_name, birthday, joined_date, detail)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(parent_id)
        .bind(&dto.last_name)
        .bind(&dto.first_name)
        .bind(dto.birthday)
        .bind(joined_date)
        .bind(&dto.detail)
        .fetch_one(db)
        .await?;

        track_child_registered();
        info!(child.id = %id, parent.id = %parent_id, "Child registered");

        Self::get_child(db, ChildScope::Parent(parent_id), id).await
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "children"))]
    pub async fn list_children(
        db: &PgPool,
        scope: ChildScope,
        pagination: &PaginationParams,
    ) -> Result<PaginatedChildrenResponse, AppError> {
        let count_query = format!(
            "SELECT COUNT(*) FROM children c WHERE {}",
            scope.predicate()
        );
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(parent_id) = scope.parent_id() {
            count = count.bind(parent_id);
        }
        let total = count.fetch_one(db).await?;

        let query = format!(
            "{} WHERE {} ORDER BY c.last_name, c.first_name, c.id LIMIT {} OFFSET {}",
            CHILD_SELECT,
            scope.predicate(),
            pagination.limit(),
            pagination.offset()
        );
        let mut rows = sqlx::query_as::<_, ChildRow>(&query);
        if let Some(parent_id) = scope.parent_id() {
            rows = rows.bind(parent_id);
        }
        let children = rows.fetch_all(db).await?;

        Ok(PaginatedChildrenResponse {
            data: children.into_iter().map(ChildResponse::from).collect(),
            meta: pagination.meta(total),
        })
    }

    /// Loads a child visible in `scope`, 404 otherwise.
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "children"))]
    pub async fn get_child(
        db: &PgPool,
        scope: ChildScope,
        child_id: Uuid,
    ) -> Result<ChildResponse, AppError> {
        let id_param = if scope.parent_id().is_some() { "$2" } else { "$1" };
        let query = format!(
            "{} WHERE {} AND c.id = {}",
            CHILD_SELECT,
            scope.predicate(),
            id_param
        );

        let mut row = sqlx::query_as::<_, ChildRow>(&query);
        if let Some(parent_id) = scope.parent_id() {
            row = row.bind(parent_id);
        }

        row.bind(child_id)
            .fetch_optional(db)
            .await?
            .map(ChildResponse::from)
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Child not found")))
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "children"))]
    pub async fn update_child(
        db: &PgPool,
        scope: ChildScope,
        child_id: Uuid,
        dto: UpdateChildDto,
    ) -> Result<ChildResponse, AppError> {
        let existing = Self::get_child(db, scope, child_id).await?;
        ensure_owner(&existing, scope.parent_id())?;

        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let birthday = dto.birthday.unwrap_or(existing.birthday);
        let joined_date = dto.joined_date.unwrap_or(existing.joined_date);
        let detail = dto.detail.or(existing.detail);

        sqlx::query(
            r#"UPDATE children
               SET last_name = $1, first_name = $2, birthday = $3, joined_date = $4,
                   detail = $5, updated_at = NOW()
               WHERE id = $6"#,
        )
        .bind(&last_name)
        .bind(&first_name)
        .bind(birthday)
        .bind(joined_date)
        .bind(&detail)
        .bind(child_id)
        .execute(db)
        .await?;

        Self::get_child(db, scope, child_id).await
    }

    /// Soft delete: the row stays with `existe = false`.
    #[instrument(skip(db), fields(db.operation = "UPDATE", db.table = "children"))]
    pub async fn delete_child(
        db: &PgPool,
        scope: ChildScope,
        child_id: Uuid,
    ) -> Result<(), AppError> {
        let existing = Self::get_child(db, scope, child_id).await?;
        ensure_owner(&existing, scope.parent_id())?;

        sqlx::query("UPDATE children SET existe = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(child_id)
            .execute(db)
            .await?;

        info!(child.id = %child_id, "Child removed");
        Ok(())
    }
}

fn ensure_owner(child: &ChildResponse, caller_profile: Option<Uuid>) -> Result<(), AppError> {
    if caller_profile == Some(child.parent.id) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only the child's parent can change this record".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_predicates() {
        let parent = Uuid::new_v4();
        assert_eq!(ChildScope::All.predicate(), "TRUE");
        assert_eq!(ChildScope::Nothing.predicate(), "FALSE");
        assert!(ChildScope::Parent(parent).predicate().contains("c.existe"));
        assert_eq!(ChildScope::Parent(parent).parent_id(), Some(parent));
        assert_eq!(ChildScope::All.parent_id(), None);
    }
}
