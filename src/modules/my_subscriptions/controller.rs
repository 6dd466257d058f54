use axum::{
    Json,
    extract::{Path, Query, State},
};
use creche_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::RequireParent;
use crate::modules::my_subscriptions::model::{
    MySubscriptionResponse, PaginatedMySubscriptionsResponse, SubscriptionFilterParams,
};
use crate::modules::my_subscriptions::service::MySubscriptionService;
use crate::state::AppState;
use crate::utils::auth_helpers::current_profile_id;

/// The caller's current subscriptions across all nurseries
#[utoipa::path(
    get,
    path = "/api/client/mysubscriptions",
    params(SubscriptionFilterParams),
    responses(
        (status = 200, description = "Subscriptions with plan and nursery", body = PaginatedMySubscriptionsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only parents")
    ),
    tag = "My Subscriptions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn list_my_subscriptions(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
    Query(filters): Query<SubscriptionFilterParams>,
) -> Result<Json<PaginatedMySubscriptionsResponse>, AppError> {
    let parent_id = current_profile_id(&state.db, &auth_user).await?;
    let subscriptions =
        MySubscriptionService::list(&state.db, parent_id, &filters.pagination).await?;
    Ok(Json(subscriptions))
}

#[utoipa::path(
    get,
    path = "/api/client/mysubscriptions/{subscription_id}",
    params(("subscription_id" = Uuid, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "Subscription", body = MySubscriptionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only parents"),
        (status = 404, description = "Subscription not found")
    ),
    tag = "My Subscriptions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn get_my_subscription(
    State(state): State<AppState>,
    RequireParent(auth_user): RequireParent,
    Path(subscription_id): Path<Uuid>,
) -> Result<Json<MySubscriptionResponse>, AppError> {
    let parent_id = current_profile_id(&state.db, &auth_user).await?;
    let subscription = MySubscriptionService::get(&state.db, parent_id, subscription_id).await?;
    Ok(Json(subscription))
}
