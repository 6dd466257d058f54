use creche_auth::{create_access_token, create_refresh_token, verify_refresh_token};
use creche_config::JwtConfig;
use creche_core::{AppError, hash_password, verify_password};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::metrics;
use crate::modules::auth::model::{
    ChangePasswordDto, LoginRequest, LoginResponse, LoginUser, Profile, RegisterDto, TokenPair,
    UserCredentials,
};
use crate::modules::users::service::{ProfileFields, UserService};

const CREDENTIALS_QUERY: &str = r#"SELECT u.id, u.username, u.email, u.password, u.is_staff,
                                          u.is_active, p.user_type
                                   FROM users u
                                   JOIN profiles p ON p.user_id = u.id"#;

pub struct AuthService;

impl AuthService {
    /// Creates the account and its profile in one transaction.
    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "users"))]
    pub async fn register(db: &PgPool, dto: RegisterDto) -> Result<Profile, AppError> {
        let user_type = dto.user_type();
        let fields = ProfileFields {
            contact: dto.contact,
            address: dto.address,
            birthday: dto.birthday,
        };

        let mut tx = db.begin().await?;
        let profile_id =
            UserService::insert_account(&mut tx, &dto.user, fields, user_type, false).await?;
        let profile = UserService::get_profile_by_id(&mut tx, profile_id).await?;
        tx.commit().await?;

        metrics::track_user_registered(user_type.as_str());
        info!(profile.id = %profile.id, "User registered");
        Ok(profile)
    }

    /// Checks the credentials and issues an access/refresh pair.
    #[instrument(skip(db, dto, jwt_config), fields(user.username = %dto.username))]
    pub async fn obtain_token(
        db: &PgPool,
        dto: &LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<(TokenPair, UserCredentials), AppError> {
        let query = format!("{} WHERE u.username = $1", CREDENTIALS_QUERY);
        let credentials = sqlx::query_as::<_, UserCredentials>(&query)
            .bind(&dto.username)
            .fetch_optional(db)
            .await?;

        let Some(credentials) = credentials else {
            warn!("Login attempt for unknown username");
            metrics::track_user_login_failure("unknown_user");
            return Err(invalid_credentials());
        };

        if !verify_password(&dto.password, &credentials.password)? {
            warn!(user.id = %credentials.id, "Login attempt with wrong password");
            metrics::track_user_login_failure("invalid_password");
            return Err(invalid_credentials());
        }

        if !credentials.is_active {
            warn!(user.id = %credentials.id, "Login attempt on inactive account");
            metrics::track_user_login_failure("inactive");
            return Err(invalid_credentials());
        }

        let tokens = issue_tokens(&credentials, jwt_config)?;
        metrics::track_user_login_success();
        info!(user.id = %credentials.id, "User authenticated");
        Ok((tokens, credentials))
    }

    pub async fn login(
        db: &PgPool,
        dto: &LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let (tokens, credentials) = Self::obtain_token(db, dto, jwt_config).await?;

        Ok(LoginResponse {
            access: tokens.access,
            refresh: tokens.refresh,
            user: LoginUser {
                id: credentials.id,
                username: credentials.username,
                email: credentials.email,
                is_staff: credentials.is_staff,
            },
        })
    }

    /// Exchanges a refresh token for a new pair. The account must still be active.
    #[instrument(skip(db, refresh_token, jwt_config))]
    pub async fn refresh(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPair, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)?;
        let user_id = claims.user_id()?;

        let query = format!("{} WHERE u.id = $1", CREDENTIALS_QUERY);
        let credentials = sqlx::query_as::<_, UserCredentials>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| {
                AppError::unauthorized("Invalid or expired refresh token".to_string())
            })?;

        issue_tokens(&credentials, jwt_config)
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "users"))]
    pub async fn change_password(
        db: &PgPool,
        user_id: Uuid,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let current_hash =
            sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if !verify_password(&dto.old_password, &current_hash)? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Current password is incorrect"
            )));
        }

        let new_hash = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user_id)
            .execute(db)
            .await?;

        info!(user.id = %user_id, "Password changed");
        Ok(())
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("No active account found with the given credentials".to_string())
}

fn issue_tokens(
    credentials: &UserCredentials,
    jwt_config: &JwtConfig,
) -> Result<TokenPair, AppError> {
    let access = create_access_token(
        credentials.id,
        &credentials.username,
        credentials.user_type,
        credentials.is_staff,
        jwt_config,
    )?;
    metrics::track_jwt_issued("access");

    let refresh = create_refresh_token(credentials.id, jwt_config)?;
    metrics::track_jwt_issued("refresh");

    Ok(TokenPair { access, refresh })
}
