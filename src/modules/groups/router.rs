use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_group, delete_group, get_group, list_groups, update_group};

pub fn init_groups_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_group).get(list_groups))
        .route(
            "/{group_id}",
            get(get_group)
                .put(update_group)
                .patch(update_group)
                .delete(delete_group),
        )
}
