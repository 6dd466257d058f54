use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_subscription, delete_subscription, get_subscription, list_subscriptions,
    update_subscription,
};

pub fn init_subscriptions_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subscription).get(list_subscriptions))
        .route(
            "/{subscription_id}",
            get(get_subscription)
                .put(update_subscription)
                .patch(update_subscription)
                .delete(delete_subscription),
        )
}
