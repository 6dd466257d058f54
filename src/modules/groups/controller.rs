//! Groups are nested under a classroom. Every handler first checks the caller's
//! nursery access, then that the classroom belongs to the nursery in the path.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use creche_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::classrooms::service::ClassroomService;
use crate::modules::groups::model::{
    CreateGroupDto, GroupFilterParams, GroupResponse, PaginatedGroupsResponse, UpdateGroupDto,
};
use crate::modules::groups::service::GroupService;
use crate::state::AppState;
use crate::utils::auth_helpers::resolve_nursery_access;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}/groups",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID")
    ),
    request_body = CreateGroupDto,
    responses(
        (status = 201, description = "Group created", body = GroupResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Classroom not found in this nursery"),
        (status = 409, description = "Name already used in this classroom"),
        (status = 422, description = "Validation error")
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn create_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<CreateGroupDto>,
) -> Result<(StatusCode, Json<GroupResponse>), AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;
    ClassroomService::find_classroom(&state.db, nursery_id, classroom_id).await?;

    let group = GroupService::create_group(&state.db, classroom_id, dto).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}/groups",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID"),
        GroupFilterParams
    ),
    responses(
        (status = 200, description = "Groups ordered by name", body = PaginatedGroupsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No access to this nursery"),
        (status = 404, description = "Classroom not found in this nursery")
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn list_groups(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id)): Path<(Uuid, Uuid)>,
    Query(filters): Query<GroupFilterParams>,
) -> Result<Json<PaginatedGroupsResponse>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_read()?;
    ClassroomService::find_classroom(&state.db, nursery_id, classroom_id).await?;

    let groups = GroupService::list_groups(&state.db, classroom_id, &filters.pagination).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}/groups/{group_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID"),
        ("group_id" = Uuid, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "Group details", body = GroupResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No access to this nursery"),
        (status = 404, description = "Group not found")
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn get_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id, group_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<GroupResponse>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_read()?;
    ClassroomService::find_classroom(&state.db, nursery_id, classroom_id).await?;

    let group = GroupService::get_group(&state.db, classroom_id, group_id).await?;
    Ok(Json(group))
}

#[utoipa::path(
    put,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}/groups/{group_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID"),
        ("group_id" = Uuid, Path, description = "Group ID")
    ),
    request_body = UpdateGroupDto,
    responses(
        (status = 200, description = "Group updated", body = GroupResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Group not found"),
        (status = 409, description = "Name already used in this classroom")
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn update_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id, group_id)): Path<(Uuid, Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateGroupDto>,
) -> Result<Json<GroupResponse>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;
    ClassroomService::find_classroom(&state.db, nursery_id, classroom_id).await?;

    let group = GroupService::update_group(&state.db, classroom_id, group_id, dto).await?;
    Ok(Json(group))
}

#[utoipa::path(
    delete,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}/groups/{group_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID"),
        ("group_id" = Uuid, Path, description = "Group ID")
    ),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Group not found")
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn delete_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id, group_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;
    ClassroomService::find_classroom(&state.db, nursery_id, classroom_id).await?;

    GroupService::delete_group(&state.db, classroom_id, group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
