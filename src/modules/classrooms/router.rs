use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_classroom, delete_classroom, get_classroom, list_classrooms, update_classroom,
};

pub fn init_classrooms_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_classroom).get(list_classrooms))
        .route(
            "/{classroom_id}",
            get(get_classroom)
                .put(update_classroom)
                .patch(update_classroom)
                .delete(delete_classroom),
        )
}
