//! Children are visible to admins (all of them) and to their own parent while
//! `existe` is set. Only the parent may change or remove a child.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use creche_core::AppError;
use creche_models::UserType;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{AuthUser, RequireParent};
use crate::modules::children::model::{
    ChildFilterParams, ChildResponse, CreateChildDto, PaginatedChildrenResponse, UpdateChildDto,
};
use crate::modules::children::service::{ChildScope, ChildService};
use crate::state::AppState;
use crate::utils::auth_helpers::current_profile_id;
use crate::validator::ValidatedJson;

async fn scope_for(state: &AppState, auth_user: &AuthUser) -> Result<ChildScope, AppError> {
    if auth_user.is_admin() {
        return Ok(ChildScope::All);
    }
    if auth_user.user_type() == UserType::Parent {
        let profile_id = current_profile_id(&state.db, auth_user).await?;
        return Ok(ChildScope::Parent(profile_id));
    }
    Ok(ChildScope::Nothing)
}

#[utoipa::path(
    post,
    path = "/api/client/child",
    request_body = CreateChildDto,
    responses(
        (status = 201, description = "Child registered", body = ChildResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only parents can register children"),
        (status = 422, description = "Validation error")
    ),
    tag = "Children",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn create_child(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
    ValidatedJson(dto): ValidatedJson<CreateChildDto>,
) -> Result<(StatusCode, Json<ChildResponse>), AppError> {
    let parent_id = current_profile_id(&state.db, &auth_user).await?;
    let child = ChildService::create_child(&state.db, parent_id, dto).await?;
    Ok((StatusCode::CREATED, Json(child)))
}

#[utoipa::path(
    get,
    path = "/api/client/child",
    params(ChildFilterParams),
    responses(
        (status = 200, description = "Visible children", body = PaginatedChildrenResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Children",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn list_children(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<ChildFilterParams>,
) -> Result<Json<PaginatedChildrenResponse>, AppError> {
    let scope = scope_for(&state, &auth_user).await?;
    let children = ChildService::list_children(&state.db, scope, &filters.pagination).await?;
    Ok(Json(children))
}

#[utoipa::path(
    get,
    path = "/api/client/child/{child_id}",
    params(("child_id" = Uuid, Path, description = "Child ID")),
    responses(
        (status = 200, description = "Child details", body = ChildResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Child not found")
    ),
    tag = "Children",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn get_child(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(child_id): Path<Uuid>,
) -> Result<Json<ChildResponse>, AppError> {
    let scope = scope_for(&state, &auth_user).await?;
    let child = ChildService::get_child(&state.db, scope, child_id).await?;
    Ok(Json(child))
}

#[utoipa::path(
    put,
    path = "/api/client/child/{child_id}",
    params(("child_id" = Uuid, Path, description = "Child ID")),
    request_body = UpdateChildDto,
    responses(
        (status = 200, description = "Child updated", body = ChildResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the child's parent"),
        (status = 404, description = "Child not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Children",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn update_child(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(child_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateChildDto>,
) -> Result<Json<ChildResponse>, AppError> {
    let scope = scope_for(&state, &auth_user).await?;
    let child = ChildService::update_child(&state.db, scope, child_id, dto).await?;
    Ok(Json(child))
}

#[utoipa::path(
    delete,
    path = "/api/client/child/{child_id}",
    params(("child_id" = Uuid, Path, description = "Child ID")),
    responses(
        (status = 204, description = "Child removed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the child's parent"),
        (status = 404, description = "Child not found")
    ),
    tag = "Children",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn delete_child(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(child_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let scope = scope_for(&state, &auth_user).await?;
    ChildService::delete_child(&state.db, scope, child_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
