use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    get_public_nursery, get_public_plan, list_public_nurseries, list_public_plans,
};

/// Public nursery directory. No authentication.
pub fn init_public_nurseries_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_public_nurseries))
        .route("/{nursery_id}", get(get_public_nursery))
        .route("/{nursery_id}/myplans", get(list_public_plans))
        .route("/{nursery_id}/myplans/{plan_id}", get(get_public_plan))
}
