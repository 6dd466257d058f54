use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use creche_core::AppError;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::middleware::auth::{AuthUser, RequireAdmin, RequireNurseryManager};
use crate::modules::nurseries::model::{
    CreateNurseryDto, DocumentKind, NurseryFilterParams, NurseryResponse, OpeningHour,
    OpeningHourDto, PaginatedNurseriesResponse, UpdateNurseryDto, VerifyNurseryDto,
    validate_schedule,
};
use crate::modules::nurseries::service::NurseryService;
use crate::state::AppState;
use crate::utils::auth_helpers::{NurseryAccess, current_profile_id, resolve_nursery_access};
use crate::validator::{JsonBody, ValidatedJson};

/// Multipart form accepted by the document upload endpoint.
#[derive(ToSchema)]
pub struct DocumentUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Create the caller's nursery
#[utoipa::path(
    post,
    path = "/api/client/nursery",
    request_body = CreateNurseryDto,
    responses(
        (status = 201, description = "Nursery created", body = NurseryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a nursery manager"),
        (status = 409, description = "Caller already manages a nursery"),
        (status = 422, description = "Validation error")
    ),
    tag = "Nurseries",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn create_nursery(
    State(state): State<AppState>,
    RequireNurseryManager(auth_user): RequireNurseryManager,
    ValidatedJson(dto): ValidatedJson<CreateNurseryDto>,
) -> Result<(StatusCode, Json<NurseryResponse>), AppError> {
    let manager_id = current_profile_id(&state.db, &auth_user).await?;
    let nursery =
        NurseryService::create_nursery(&state.db, state.file_storage.as_ref(), manager_id, dto)
            .await?;
    Ok((StatusCode::CREATED, Json(nursery)))
}

/// List nurseries: all of them for admins, the managed one otherwise
#[utoipa::path(
    get,
    path = "/api/client/nursery",
    params(NurseryFilterParams),
    responses(
        (status = 200, description = "Nurseries", body = PaginatedNurseriesResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Nurseries",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn list_nurseries(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<NurseryFilterParams>,
) -> Result<Json<PaginatedNurseriesResponse>, AppError> {
    let manager_id = if auth_user.is_admin() {
        None
    } else {
        Some(current_profile_id(&state.db, &auth_user).await?)
    };

    let nurseries =
        NurseryService::list_nurseries(&state.db, state.file_storage.as_ref(), manager_id, filters)
            .await?;
    Ok(Json(nurseries))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID")),
    responses(
        (status = 200, description = "Nursery details", body = NurseryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Nursery not found")
    ),
    tag = "Nurseries",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn get_nursery(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
) -> Result<Json<NurseryResponse>, AppError> {
    let access = resolve_nursery_access(&state.db, &auth_user, nursery_id).await?;
    if !access.is_owner_or_admin() {
        return Err(AppError::not_found(anyhow::anyhow!("Nursery not found")));
    }

    let nursery =
        NurseryService::get_nursery(&state.db, state.file_storage.as_ref(), nursery_id).await?;
    Ok(Json(nursery))
}

/// Update a nursery (owning manager only)
#[utoipa::path(
    put,
    path = "/api/client/nursery/{nursery_id}",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID")),
    request_body = UpdateNurseryDto,
    responses(
        (status = 200, description = "Nursery updated", body = NurseryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller does not own this nursery"),
        (status = 404, description = "Nursery not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Nurseries",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn update_nursery(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateNurseryDto>,
) -> Result<Json<NurseryResponse>, AppError> {
    require_owner(&state, &auth_user, nursery_id).await?;

    let nursery =
        NurseryService::update_nursery(&state.db, state.file_storage.as_ref(), nursery_id, dto)
            .await?;
    Ok(Json(nursery))
}

/// Delete a nursery and everything attached to it (admin only)
#[utoipa::path(
    delete,
    path = "/api/client/nursery/{nursery_id}",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID")),
    responses(
        (status = 204, description = "Nursery deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Nursery not found")
    ),
    tag = "Nurseries",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_nursery(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(nursery_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    NurseryService::delete_nursery(&state.db, state.file_storage.as_ref(), nursery_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a nursery as verified or not (admin only)
#[utoipa::path(
    patch,
    path = "/api/client/nursery/{nursery_id}/verify",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID")),
    request_body = VerifyNurseryDto,
    responses(
        (status = 200, description = "Verification updated", body = NurseryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Nursery not found")
    ),
    tag = "Nurseries",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn verify_nursery(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(nursery_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<VerifyNurseryDto>,
) -> Result<Json<NurseryResponse>, AppError> {
    let nursery = NurseryService::set_verified(
        &state.db,
        state.file_storage.as_ref(),
        nursery_id,
        dto.verified,
    )
    .await?;
    Ok(Json(nursery))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/opening-hours",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID")),
    responses(
        (status = 200, description = "Weekly schedule ordered by day", body = Vec<OpeningHour>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No access to this nursery"),
        (status = 404, description = "Nursery not found")
    ),
    tag = "Nurseries",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn get_opening_hours(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
) -> Result<Json<Vec<OpeningHour>>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_read()?;

    let hours = NurseryService::get_opening_hours(&state.db, nursery_id).await?;
    Ok(Json(hours))
}

/// Replace the weekly schedule
#[utoipa::path(
    put,
    path = "/api/client/nursery/{nursery_id}/opening-hours",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID")),
    request_body = Vec<OpeningHourDto>,
    responses(
        (status = 204, description = "Schedule replaced"),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Nursery not found"),
        (status = 422, description = "Invalid or duplicate day")
    ),
    tag = "Nurseries",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, hours), fields(user.id = %auth_user.0.sub))]
pub async fn replace_opening_hours(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
    JsonBody(hours): JsonBody<Vec<OpeningHourDto>>,
) -> Result<StatusCode, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;

    validate_schedule(&hours).map_err(|errors| AppError::validation(&errors))?;

    NurseryService::replace_opening_hours(&state.db, nursery_id, hours).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload a nursery document or photo (multipart field `file`)
#[utoipa::path(
    post,
    path = "/api/client/nursery/{nursery_id}/documents/{kind}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("kind" = DocumentKind, Path, description = "Which document to replace")
    ),
    request_body(content = DocumentUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document stored", body = NurseryResponse),
        (status = 400, description = "Missing file field"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller does not own this nursery"),
        (status = 404, description = "Nursery or document kind not found"),
        (status = 413, description = "File too large"),
        (status = 422, description = "Unsupported file type")
    ),
    tag = "Nurseries",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, multipart), fields(user.id = %auth_user.0.sub))]
pub async fn upload_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, kind)): Path<(Uuid, String)>,
    mut multipart: Multipart,
) -> Result<Json<NurseryResponse>, AppError> {
    let kind: DocumentKind = kind
        .parse()
        .map_err(|e: String| AppError::not_found(anyhow::anyhow!(e)))?;

    require_owner(&state, &auth_user, nursery_id).await?;
    let nursery = NurseryService::find_nursery(&state.db, nursery_id).await?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::new(e.status(), anyhow::anyhow!("Invalid multipart body: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| {
            AppError::new(e.status(), anyhow::anyhow!("Failed to read file: {}", e))
        })?;
        upload = Some((content_type, bytes));
        break;
    }

    let (content_type, bytes) = upload
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("file is required")))?;

    let nursery = NurseryService::upload_document(
        &state.db,
        state.file_storage.as_ref(),
        nursery,
        kind,
        &content_type,
        &bytes,
    )
    .await?;
    Ok(Json(nursery))
}

async fn require_owner(
    state: &AppState,
    auth_user: &AuthUser,
    nursery_id: Uuid,
) -> Result<(), AppError> {
    match resolve_nursery_access(&state.db, auth_user, nursery_id).await? {
        NurseryAccess::Manager => Ok(()),
        _ => Err(AppError::forbidden(
            "Only the nursery manager can modify this nursery".to_string(),
        )),
    }
}
