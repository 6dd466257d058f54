use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

use super::controller::{
    change_password, login, obtain_token, refresh_token, register, verify_token,
};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/token", post(obtain_token))
        .route("/token/refresh", post(refresh_token))
        .route("/token/verify", post(verify_token))
        .route("/login", post(login))
        .route("/password", put(change_password).patch(change_password))
}
