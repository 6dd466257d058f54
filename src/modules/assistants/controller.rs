use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use creche_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::assistants::model::{
    AssistantFilterParams, AssistantResponse, CreateAssistantDto, PaginatedAssistantsResponse,
    UpdateAssistantDto,
};
use crate::modules::assistants::service::AssistantService;
use crate::state::AppState;
use crate::utils::auth_helpers::resolve_nursery_access;
use crate::validator::ValidatedJson;

/// Create an assistant account attached to the nursery
#[utoipa::path(
    post,
    path = "/api/client/nursery/{nursery_id}/assistants",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID")),
    request_body = CreateAssistantDto,
    responses(
        (status = 201, description = "Assistant created", body = AssistantResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Nursery not found"),
        (status = 409, description = "Username or email already taken"),
        (status = 422, description = "Validation error or classroom/group outside the nursery")
    ),
    tag = "Assistants",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(user.id = %auth_user.0.sub))]
pub async fn create_assistant(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateAssistantDto>,
) -> Result<(StatusCode, Json<AssistantResponse>), AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;

    let assistant = AssistantService::create_assistant(&state.db, nursery_id, dto).await?;
    Ok((StatusCode::CREATED, Json(assistant)))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/assistants",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID"), AssistantFilterParams),
    responses(
        (status = 200, description = "Assistants of the nursery", body = PaginatedAssistantsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No access to this nursery"),
        (status = 404, description = "Nursery not found")
    ),
    tag = "Assistants",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn list_assistants(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
    Query(filters): Query<AssistantFilterParams>,
) -> Result<Json<PaginatedAssistantsResponse>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_read()?;

    let assistants = AssistantService::list_assistants(&state.db, nursery_id, filters).await?;
    Ok(Json(assistants))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/assistants/{assistant_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("assistant_id" = Uuid, Path, description = "Assistant ID")
    ),
    responses(
        (status = 200, description = "Assistant details", body = AssistantResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No access to this nursery"),
        (status = 404, description = "Assistant not found")
    ),
    tag = "Assistants",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn get_assistant(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, assistant_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AssistantResponse>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_read()?;

    let assistant = AssistantService::get_assistant(&state.db, nursery_id, assistant_id).await?;
    Ok(Json(assistant))
}

#[utoipa::path(
    put,
    path = "/api/client/nursery/{nursery_id}/assistants/{assistant_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("assistant_id" = Uuid, Path, description = "Assistant ID")
    ),
    request_body = UpdateAssistantDto,
    responses(
        (status = 200, description = "Assistant updated", body = AssistantResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Assistant not found"),
        (status = 422, description = "Classroom or group outside the nursery")
    ),
    tag = "Assistants",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn update_assistant(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, assistant_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateAssistantDto>,
) -> Result<Json<AssistantResponse>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;

    let assistant =
        AssistantService::update_assistant(&state.db, nursery_id, assistant_id, dto).await?;
    Ok(Json(assistant))
}

#[utoipa::path(
    delete,
    path = "/api/client/nursery/{nursery_id}/assistants/{assistant_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("assistant_id" = Uuid, Path, description = "Assistant ID")
    ),
    responses(
        (status = 204, description = "Assistant removed from the nursery"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Assistant not found")
    ),
    tag = "Assistants",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn delete_assistant(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, assistant_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;

    AssistantService::delete_assistant(&state.db, nursery_id, assistant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
