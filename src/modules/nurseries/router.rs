use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_nursery, delete_nursery, get_nursery, get_opening_hours, list_nurseries,
    replace_opening_hours, update_nursery, upload_document, verify_nursery,
};

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// `max_upload_bytes` bounds the document upload body; the storage layer
/// still rejects files over the cap with 413.
pub fn init_nurseries_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(create_nursery).get(list_nurseries))
        .route(
            "/{nursery_id}",
            get(get_nursery)
                .put(update_nursery)
                .patch(update_nursery)
                .delete(delete_nursery),
        )
        .route("/{nursery_id}/verify", patch(verify_nursery))
        .route(
            "/{nursery_id}/opening-hours",
            get(get_opening_hours)
                .post(replace_opening_hours)
                .put(replace_opening_hours)
                .patch(replace_opening_hours),
        )
        .route(
            "/{nursery_id}/documents/{kind}",
            post(upload_document).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
            )),
        )
}
