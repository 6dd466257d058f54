use axum::{Json, extract::State};
use creche_core::AppError;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{Profile, UpdateProfileDto};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/client/profile",
    responses(
        (status = 200, description = "Current profile", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Profile>, AppError> {
    let user_id = auth_user.user_id()?;
    let profile = UserService::get_profile_by_user(&state.db, user_id).await?;
    Ok(Json(profile))
}

/// Update the caller's profile
#[utoipa::path(
    put,
    path = "/api/client/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Validation error")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user.id = %auth_user.0.sub))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<Profile>, AppError> {
    let user_id = auth_user.user_id()?;
    let profile = UserService::update_profile(&state.db, user_id, dto).await?;
    Ok(Json(profile))
}
