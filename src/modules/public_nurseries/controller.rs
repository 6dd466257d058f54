use axum::{
    Json,
    extract::{Path, Query, State},
};
use creche_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::plans::service::PlanService;
use crate::modules::public_nurseries::model::{
    PaginatedNurseryBasicResponse, PaginatedPlansResponse, Plan, PlanFilterParams,
    PublicNurseryDetail, PublicNurseryFilterParams,
};
use crate::modules::public_nurseries::service::PublicNurseryService;
use crate::state::AppState;

/// Browse verified nurseries
#[utoipa::path(
    get,
    path = "/api/client/mynursery",
    params(PublicNurseryFilterParams),
    responses(
        (status = 200, description = "Verified nurseries", body = PaginatedNurseryBasicResponse)
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn list_public_nurseries(
    State(state): State<AppState>,
    Query(filters): Query<PublicNurseryFilterParams>,
) -> Result<Json<PaginatedNurseryBasicResponse>, AppError> {
    let nurseries = PublicNurseryService::list_nurseries(&state.db, filters).await?;
    Ok(Json(nurseries))
}

#[utoipa::path(
    get,
    path = "/api/client/mynursery/{nursery_id}",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID")),
    responses(
        (status = 200, description = "Public nursery details", body = PublicNurseryDetail),
        (status = 404, description = "Nursery not found or not verified")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_public_nursery(
    State(state): State<AppState>,
    Path(nursery_id): Path<Uuid>,
) -> Result<Json<PublicNurseryDetail>, AppError> {
    let nursery =
        PublicNurseryService::get_nursery(&state.db, state.file_storage.as_ref(), nursery_id)
            .await?;
    Ok(Json(nursery))
}

#[utoipa::path(
    get,
    path = "/api/client/mynursery/{nursery_id}/myplans",
    params(("nursery_id" = Uuid, Path, description = "Nursery ID"), PlanFilterParams),
    responses(
        (status = 200, description = "Active plans", body = PaginatedPlansResponse),
        (status = 404, description = "Nursery not found or not verified")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn list_public_plans(
    State(state): State<AppState>,
    Path(nursery_id): Path<Uuid>,
    Query(filters): Query<PlanFilterParams>,
) -> Result<Json<PaginatedPlansResponse>, AppError> {
    PublicNurseryService::find_public_nursery(&state.db, nursery_id).await?;

    let plans = PlanService::list_active_plans(&state.db, nursery_id, &filters.pagination).await?;
    Ok(Json(plans))
}

#[utoipa::path(
    get,
    path = "/api/client/mynursery/{nursery_id}/myplans/{plan_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("plan_id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Plan details", body = Plan),
        (status = 404, description = "Nursery or plan not found")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_public_plan(
    State(state): State<AppState>,
    Path((nursery_id, plan_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Plan>, AppError> {
    PublicNurseryService::find_public_nursery(&state.db, nursery_id).await?;

    let plan = PlanService::get_active_plan(&state.db, nursery_id, plan_id).await?;
    Ok(Json(plan))
}
