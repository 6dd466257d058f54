use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_plan, delete_plan, get_plan, list_plans, update_plan};

pub fn init_plans_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_plan).get(list_plans))
        .route(
            "/{plan_id}",
            get(get_plan)
                .put(update_plan)
                .patch(update_plan)
                .delete(delete_plan),
        )
}
