use axum::{Json, extract::State, http::StatusCode};
use creche_core::AppError;
use serde_json::{Value, json};
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::{
    ChangePasswordDto, LoginRequest, LoginResponse, MessageResponse, Profile, RefreshTokenRequest,
    RegisterDto, TokenPair, VerifyTokenRequest,
};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Register a parent or nursery manager account
#[utoipa::path(
    post,
    path = "/api/client/register",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = Profile),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterDto>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let profile = AuthService::register(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Obtain an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/client/token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair", body = TokenPair),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn obtain_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let (tokens, _) = AuthService::obtain_token(&state.db, &dto, &state.jwt_config).await?;
    Ok(Json(tokens))
}

/// Log in and receive tokens with an account summary
#[utoipa::path(
    post,
    path = "/api/client/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, &dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new pair
#[utoipa::path(
    post,
    path = "/api/client/token/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let tokens = AuthService::refresh(&state.db, &dto.refresh, &state.jwt_config).await?;
    Ok(Json(tokens))
}

/// Check that an access token is valid
#[utoipa::path(
    post,
    path = "/api/client/token/verify",
    request_body = VerifyTokenRequest,
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn verify_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerifyTokenRequest>,
) -> Result<Json<Value>, AppError> {
    creche_auth::verify_token(&dto.token, &state.jwt_config)?;
    Ok(Json(json!({})))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/api/client/password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(user.id = %auth_user.0.sub))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    AuthService::change_password(&state.db, user_id, dto).await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}
