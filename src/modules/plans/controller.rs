use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use creche_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::nurseries::service::NurseryService;
use crate::modules::plans::model::{
    CreatePlanDto, PaginatedPlansResponse, Plan, PlanFilterParams, UpdatePlanDto,
};
use crate::modules::plans::service::PlanService;
use crate::state::AppState;
use crate::utils::auth_helpers::resolve_nursery_access;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/client/nursery/{nursery_id}/plans",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID")),
    request_body = CreatePlanDto,
    responses(
        (status = 201, description = "Plan created", body = Plan),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Nursery not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Plans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn create_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreatePlanDto>,
) -> Result<(StatusCode, Json<Plan>), AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;

    let plan = PlanService::create_plan(&state.db, nursery_id, dto).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// List the active plans of a nursery
#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/plans",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID"), PlanFilterParams),
    responses(
        (status = 200, description = "Active plans", body = PaginatedPlansResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Nursery not found")
    ),
    tag = "Plans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_plans(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(nursery_id): Path<Uuid>,
    Query(filters): Query<PlanFilterParams>,
) -> Result<Json<PaginatedPlansResponse>, AppError> {
    NurseryService::find_nursery(&state.db, nursery_id).await?;

    let plans = PlanService::list_active_plans(&state.db, nursery_id, &filters.pagination).await?;
    Ok(Json(plans))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/plans/{plan_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("plan_id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Plan details", body = Plan),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Plan not found or inactive")
    ),
    tag = "Plans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_plan(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path((nursery_id, plan_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Plan>, AppError> {
    let plan = PlanService::get_active_plan(&state.db, nursery_id, plan_id).await?;
    Ok(Json(plan))
}

#[utoipa::path(
    put,
    path = "/api/client/nursery/{nursery_id}/plans/{plan_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("plan_id" = Uuid, Path, description = "Plan ID")
    ),
    request_body = UpdatePlanDto,
    responses(
        (status = 200, description = "Plan updated", body = Plan),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Plan not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Plans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn update_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, plan_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdatePlanDto>,
) -> Result<Json<Plan>, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;

    let plan = PlanService::update_plan(&state.db, nursery_id, plan_id, dto).await?;
    Ok(Json(plan))
}

#[utoipa::path(
    delete,
    path = "/api/client/nursery/{nursery_id}/plans/{plan_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("plan_id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 204, description = "Plan and its subscriptions deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to manage this nursery"),
        (status = 404, description = "Plan not found")
    ),
    tag = "Plans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn delete_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((nursery_id, plan_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    resolve_nursery_access(&state.db, &auth_user, nursery_id)
        .await?
        .require_manage()?;

    PlanService::delete_plan(&state.db, nursery_id, plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
