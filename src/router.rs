use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::activities::init_activities_router;
use crate::modules::assistants::init_assistants_router;
use crate::modules::auth::init_auth_router;
use crate::modules::children::init_children_router;
use crate::modules::classroom_activities::init_classroom_activities_router;
use crate::modules::classrooms::init_classrooms_router;
use crate::modules::groups::init_groups_router;
use crate::modules::my_subscriptions::init_my_subscriptions_router;
use crate::modules::nurseries::init_nurseries_router;
use crate::modules::plans::init_plans_router;
use crate::modules::public_nurseries::init_public_nurseries_router;
use crate::modules::subscriptions::init_subscriptions_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

/// Everything under `/nursery/{nursery_id}`.
fn init_nursery_tree(max_upload_bytes: usize) -> Router<AppState> {
    init_nurseries_router(max_upload_bytes)
        .nest("/{nursery_id}/assistants", init_assistants_router())
        .nest(
            "/{nursery_id}/classrooms",
            init_classrooms_router()
                .nest("/{classroom_id}/groups", init_groups_router())
                .nest(
                    "/{classroom_id}/activities",
                    init_classroom_activities_router(),
                ),
        )
        .nest("/{nursery_id}/activities", init_activities_router())
        .nest(
            "/{nursery_id}/plans",
            init_plans_router().nest("/{plan_id}/subscriptions", init_subscriptions_router()),
        )
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest_service(
            "/files",
            ServeDir::new(state.storage_config.upload_dir.clone()),
        )
        .nest(
            "/api/client",
            Router::new()
                .merge(init_auth_router())
                .merge(init_users_router())
                .nest(
                    "/nursery",
                    init_nursery_tree(state.storage_config.max_upload_bytes),
                )
                .nest("/mynursery", init_public_nurseries_router())
                .nest("/child", init_children_router())
                .nest("/mysubscriptions", init_my_subscriptions_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
