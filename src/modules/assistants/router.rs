use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_assistant, delete_assistant, get_assistant, list_assistants, update_assistant,
};

pub fn init_assistants_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assistant).get(list_assistants))
        .route(
            "/{assistant_id}",
            get(get_assistant)
                .put(update_assistant)
                .patch(update_assistant)
                .delete(delete_assistant),
        )
}
