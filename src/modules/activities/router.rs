use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_activity, delete_activity, get_activity, list_activities, update_activity,
};

pub fn init_activities_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_activity).get(list_activities))
        .route(
            "/{activity_id}",
            get(get_activity)
                .put(update_activity)
                .patch(update_activity)
                .delete(delete_activity),
        )
}
