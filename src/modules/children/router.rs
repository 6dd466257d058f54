use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_child, delete_child, get_child, list_children, update_child};

pub fn init_children_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_child).get(list_children))
        .route(
            "/{child_id}",
            get(get_child)
                .put(update_child)
                .patch(update_child)
                .delete(delete_child),
        )
}
