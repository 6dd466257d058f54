use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use creche_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::classroom_activities::model::{
    ActivityFilterParams, ClassroomActivity, CreateClassroomActivityDto,
    PaginatedClassroomActivitiesResponse, UpdateClassroomActivityDto,
};
use crate::modules::classroom_activities::service::ClassroomActivityService;
use crate::modules::classrooms::service::ClassroomService;
use crate::state::AppState;
use crate::utils::auth_helpers::resolve_nursery_access;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}/activities",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID")
    ),
    request_body = CreateClassroomActivityDto,
    responses(
        (status = 201, description = "Activity scheduled", body = ClassroomActivity),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Classroom not found in this nursery"),
        (status = 409, description = "Activity already scheduled in this classroom"),
        (status = 422, description = "Validation error or activity from another nursery")
    ),
    tag = "Classroom Activities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn create_classroom_activity(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<CreateClassroomActivityDto>,
) -> Result<(StatusCode, Json<ClassroomActivity>), AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;
    ClassroomService::find_classroom(&state.db, nursery_id, classroom_id).await?;

    let scheduled = ClassroomActivityService::create_classroom_activity(
        &state.db,
        nursery_id,
        classroom_id,
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(scheduled)))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}/activities",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID"),
        ActivityFilterParams
    ),
    responses(
        (status = 200, description = "Classroom schedule", body = PaginatedClassroomActivitiesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No access to this nursery"),
        (status = 404, description = "Classroom not found in this nursery")
    ),
    tag = "Classroom Activities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn list_classroom_activities(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id)): Path<(Uuid, Uuid)>,
    Query(filters): Query<ActivityFilterParams>,
) -> Result<Json<PaginatedClassroomActivitiesResponse>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_read()?;
    ClassroomService::find_classroom(&state.db, nursery_id, classroom_id).await?;

    let schedule = ClassroomActivityService::list_classroom_activities(
        &state.db,
        classroom_id,
        &filters.pagination,
    )
    .await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}/activities/{schedule_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID"),
        ("schedule_id" = Uuid, Path, description = "Classroom activity ID")
    ),
    responses(
        (status = 200, description = "Scheduled activity", body = ClassroomActivity),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No access to this nursery"),
        (status = 404, description = "Not found")
    ),
    tag = "Classroom Activities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn get_classroom_activity(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id, schedule_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<ClassroomActivity>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_read()?;
    ClassroomService::find_classroom(&state.db, nursery_id, classroom_id).await?;

    let scheduled =
        ClassroomActivityService::get_classroom_activity(&state.db, classroom_id, schedule_id)
            .await?;
    Ok(Json(scheduled))
}

#[utoipa::path(
    put,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}/activities/{schedule_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID"),
        ("schedule_id" = Uuid, Path, description = "Classroom activity ID")
    ),
    request_body = UpdateClassroomActivityDto,
    responses(
        (status = 200, description = "Schedule updated", body = ClassroomActivity),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the nursery manager or an admin"),
        (status = 404, description = "Not found"),
        (status = 422, description = "start_time must be before end_time")
    ),
    tag = "Classroom Activities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn update_classroom_activity(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id, schedule_id)): Path<(Uuid, Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateClassroomActivityDto>,
) -> Result<Json<ClassroomActivity>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_owner_or_admin()?;
    ClassroomService::find_classroom(&state.db, nursery_id, classroom_id).await?;

    let scheduled = ClassroomActivityService::update_classroom_activity(
        &state.db,
        classroom_id,
        schedule_id,
        dto,
    )
    .await?;
    Ok(Json(scheduled))
}

#[utoipa::path(
    delete,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}/activities/{schedule_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID"),
        ("schedule_id" = Uuid, Path, description = "Classroom activity ID")
    ),
    responses(
        (status = 204, description = "Removed from the schedule"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the nursery manager or an admin"),
        (status = 404, description = "Not found")
    ),
    tag = "Classroom Activities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn delete_classroom_activity(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id, schedule_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_owner_or_admin()?;
    ClassroomService::find_classroom(&state.db, nursery_id, classroom_id).await?;

    ClassroomActivityService::delete_classroom_activity(&state.db, classroom_id, schedule_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
