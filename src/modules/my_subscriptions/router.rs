use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_my_subscription, list_my_subscriptions};

pub fn init_my_subscriptions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_subscriptions))
        .route("/{subscription_id}", get(get_my_subscription))
}
