use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_classroom_activity, delete_classroom_activity, get_classroom_activity,
    list_classroom_activities, update_classroom_activity,
};

pub fn init_classroom_activities_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_classroom_activity).get(list_classroom_activities),
        )
        .route(
            "/{schedule_id}",
            get(get_classroom_activity)
                .put(update_classroom_activity)
                .patch(update_classroom_activity)
                .delete(delete_classroom_activity),
        )
}
