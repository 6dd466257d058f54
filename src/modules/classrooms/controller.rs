use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use creche_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::classrooms::model::{
    ClassroomFilterParams, ClassroomResponse, CreateClassroomDto, PaginatedClassroomsResponse,
    UpdateClassroomDto,
};
use crate::modules::classrooms::service::ClassroomService;
use crate::state::AppState;
use crate::utils::auth_helpers::resolve_nursery_access;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/client/nursery/{nursery_id}/classrooms",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID")),
    request_body = CreateClassroomDto,
    responses(
        (status = 201, description = "Classroom created", body = ClassroomResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Nursery not found"),
        (status = 409, description = "Name already used in this nursery"),
        (status = 422, description = "Validation error")
    ),
    tag = "Classrooms",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn create_classroom(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateClassroomDto>,
) -> Result<(StatusCode, Json<ClassroomResponse>), AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;

    let classroom = ClassroomService::create_classroom(&state.db, nursery_id, dto).await?;
    Ok((StatusCode::CREATED, Json(classroom)))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/classrooms",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID"), ClassroomFilterParams),
    responses(
        (status = 200, description = "Classrooms ordered by name", body = PaginatedClassroomsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No access to this nursery"),
        (status = 404, description = "Nursery not found")
    ),
    tag = "Classrooms",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn list_classrooms(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
    Query(filters): Query<ClassroomFilterParams>,
) -> Result<Json<PaginatedClassroomsResponse>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_read()?;

    let classrooms =
        ClassroomService::list_classrooms(&state.db, nursery_id, &filters.pagination).await?;
    Ok(Json(classrooms))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID")
    ),
    responses(
        (status = 200, description = "Classroom details", body = ClassroomResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No access to this nursery"),
        (status = 404, description = "Classroom not found")
    ),
    tag = "Classrooms",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn get_classroom(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ClassroomResponse>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_read()?;

    let classroom = ClassroomService::get_classroom(&state.db, nursery_id, classroom_id).await?;
    Ok(Json(classroom))
}

#[utoipa::path(
    put,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID")
    ),
    request_body = UpdateClassroomDto,
    responses(
        (status = 200, description = "Classroom updated", body = ClassroomResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Classroom not found"),
        (status = 409, description = "Name already used in this nursery"),
        (status = 422, description = "Validation error")
    ),
    tag = "Classrooms",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn update_classroom(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateClassroomDto>,
) -> Result<Json<ClassroomResponse>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;

    let classroom =
        ClassroomService::update_classroom(&state.db, nursery_id, classroom_id, dto).await?;
    Ok(Json(classroom))
}

#[utoipa::path(
    delete,
    path = "/api/client/nursery/{nursery_id}/classrooms/{classroom_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("classroom_id" = Uuid, Path, description = "Classroom ID")
    ),
    responses(
        (status = 204, description = "Classroom deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Classroom not found")
    ),
    tag = "Classrooms",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn delete_classroom(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, classroom_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;

    ClassroomService::delete_classroom(&state.db, nursery_id, classroom_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
