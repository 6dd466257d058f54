//! Subscriptions live under `/nursery/{nursery_id}/plans/{plan_id}`. Only
//! parents reach these handlers and they only ever see their own rows.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use creche_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::RequireParent;
use crate::modules::plans::service::PlanService;
use crate::modules::subscriptions::model::{
    CreateSubscriptionDto, PaginatedSubscriptionsResponse, SubscriptionFilterParams,
    SubscriptionResponse, UpdateSubscriptionDto,
};
use crate::modules::subscriptions::service::SubscriptionService;
use crate::state::AppState;
use crate::utils::auth_helpers::current_profile_id;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/client/nursery/{nursery_id}/plans/{plan_id}/subscriptions",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("plan_id" = Uuid, Path, description = "Plan ID")
    ),
    request_body = CreateSubscriptionDto,
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only parents can subscribe"),
        (status = 404, description = "No active plan with this id in the nursery"),
        (status = 422, description = "Invalid details or period")
    ),
    tag = "Subscriptions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(user.id = %auth_user.0.sub))]
pub async fn create_subscription(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
    Path((nursery_id, plan_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<CreateSubscriptionDto>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    let plan = PlanService::get_active_plan(&state.db, nursery_id, plan_id).await?;
    let parent_id = current_profile_id(&state.db, &auth_user).await?;

    let subscription =
        SubscriptionService::create_subscription(&state.db, &plan, parent_id, dto).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/plans/{plan_id}/subscriptions",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("plan_id" = Uuid, Path, description = "Plan ID"),
        SubscriptionFilterParams
    ),
    responses(
        (status = 200, description = "The caller's subscriptions on this plan", body = PaginatedSubscriptionsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only parents"),
        (status = 404, description = "No active plan with this id in the nursery")
    ),
    tag = "Subscriptions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
    Path((nursery_id, plan_id)): Path<(Uuid, Uuid)>,
    Query(filters): Query<SubscriptionFilterParams>,
) -> Result<Json<PaginatedSubscriptionsResponse>, AppError> {
    let plan = PlanService::get_active_plan(&state.db, nursery_id, plan_id).await?;
    let parent_id = current_profile_id(&state.db, &auth_user).await?;

    let subscriptions = SubscriptionService::list_subscriptions(
        &state.db,
        parent_id,
        plan.id,
        &filters.pagination,
    )
    .await?;
    Ok(Json(subscriptions))
}

#[utoipa::path(
    get,
    path = "/api/client/nursery/{nursery_id}/plans/{plan_id}/subscriptions/{subscription_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("plan_id" = Uuid, Path, description = "Plan ID"),
        ("subscription_id" = Uuid, Path, description = "Subscription ID")
    ),
    responses(
        (status = 200, description = "Subscription", body = SubscriptionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only parents"),
        (status = 404, description = "Subscription not found")
    ),
    tag = "Subscriptions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn get_subscription(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
    Path((nursery_id, plan_id, subscription_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let plan = PlanService::get_active_plan(&state.db, nursery_id, plan_id).await?;
    let parent_id = current_profile_id(&state.db, &auth_user).await?;

    let subscription =
        SubscriptionService::get_subscription(&state.db, parent_id, plan.id, subscription_id)
            .await?;
    Ok(Json(subscription))
}

#[utoipa::path(
    put,
    path = "/api/client/nursery/{nursery_id}/plans/{plan_id}/subscriptions/{subscription_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("plan_id" = Uuid, Path, description = "Plan ID"),
        ("subscription_id" = Uuid, Path, description = "Subscription ID")
    ),
    request_body = UpdateSubscriptionDto,
    responses(
        (status = 200, description = "Subscription updated", body = SubscriptionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only parents"),
        (status = 404, description = "Subscription not found"),
        (status = 422, description = "Invalid details, period or plan")
    ),
    tag = "Subscriptions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(user.id = %auth_user.0.sub))]
pub async fn update_subscription(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
    Path((nursery_id, plan_id, subscription_id)): Path<(Uuid, Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateSubscriptionDto>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let plan = PlanService::get_active_plan(&state.db, nursery_id, plan_id).await?;
    let parent_id = current_profile_id(&state.db, &auth_user).await?;

    let subscription = SubscriptionService::update_subscription(
        &state.db,
        &plan,
        parent_id,
        subscription_id,
        dto,
    )
    .await?;
    Ok(Json(subscription))
}

#[utoipa::path(
    delete,
    path = "/api/client/nursery/{nursery_id}/plans/{plan_id}/subscriptions/{subscription_id}",
    params(
        ("nursery_id" = Uuid, Path, description = "Nursery ID"),
        ("plan_id" = Uuid, Path, description = "Plan ID"),
        ("subscription_id" = Uuid, Path, description = "Subscription ID")
    ),
    responses(
        (status = 204, description = "Subscription deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only parents"),
        (status = 404, description = "Subscription not found")
    ),
    tag = "Subscriptions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn delete_subscription(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
    Path((nursery_id, plan_id, subscription_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let plan = PlanService::get_active_plan(&state.db, nursery_id, plan_id).await?;
    let parent_id = current_profile_id(&state.db, &auth_user).await?;

    SubscriptionService::delete_subscription(&state.db, parent_id, plan.id, subscription_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
