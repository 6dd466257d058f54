use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use creche_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::activities::model::{
    Activity, ActivityFilterParams, CreateActivityDto, PaginatedActivitiesResponse,
    UpdateActivityDto,
};
use crate::modules::activities::service::ActivityService;
use crate::state::AppState;
use crate::utils::auth_helpers::resolve_nursery_access;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/client/nursery/{nursery_id}/activities",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID")),
    request_body = CreateActivityDto,
    responses(
        (status = 201, description = "Activity created", body = Activity),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the nursery manager or an admin"),
        (status = 404, description = "Nursery not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Activities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn create_activity(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateActivityDto>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_owner_or_admin()?;

    let activity = ActivityService::create_activity(&state.db, nursery_id, dto).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/activities",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID"), ActivityFilterParams),
    responses(
        (status = 200, description = "Activities of the nursery", body = PaginatedActivitiesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No access to this nursery"),
        (status = 404, description = "Nursery not found")
    ),
    tag = "Activities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn list_activities(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
    Query(filters): Query<ActivityFilterParams>,
) -> Result<Json<PaginatedActivitiesResponse>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_read()?;

    let activities =
        ActivityService::list_activities(&state.db, nursery_id, &filters.pagination).await?;
    Ok(Json(activities))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/activities/{activity_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("activity_id" = Uuid, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Activity details", body = Activity),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No access to this nursery"),
        (status = 404, description = "Activity not found")
    ),
    tag = "Activities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn get_activity(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, activity_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Activity>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_read()?;

    let activity = ActivityService::get_activity(&state.db, nursery_id, activity_id).await?;
    Ok(Json(activity))
}

#[utoipa::path(
    put,
    path = "/api/client/nursery/{nursery_id}/activities/{activity_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("activity_id" = Uuid, Path, description = "Activity ID")
    ),
    request_body = UpdateActivityDto,
    responses(
        (status = 200, description = "Activity updated", body = Activity),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the nursery manager or an admin"),
        (status = 404, description = "Activity not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Activities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn update_activity(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, activity_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateActivityDto>,
) -> Result<Json<Activity>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_owner_or_admin()?;

    let activity =
        ActivityService::update_activity(&state.db, nursery_id, activity_id, dto).await?;
    Ok(Json(activity))
}

#[utoipa::path(
    delete,
    path = "/api/client/nursery/{nursery_id}/activities/{activity_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("activity_id" = Uuid, Path, description = "Activity ID")
    ),
    responses(
        (status = 204, description = "Activity deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the nursery manager or an admin"),
        (status = 404, description = "Activity not found")
    ),
    tag = "Activities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn delete_activity(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, activity_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_owner_or_admin()?;

    ActivityService::delete_activity(&state.db, nursery_id, activity_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
