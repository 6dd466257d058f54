//! Accounts and their profiles.
//!
//! Registration and assistant creation write a `users` row and its `profiles`
//! row through [`UserService::insert_account`], inside their own transaction.

use chrono::NaiveDate;
use creche_core::{AppError, hash_password};
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::users::model::{
    CreateUserDto, PROFILE_COLUMNS, Profile, ProfileRow, UpdateProfileDto, UserType,
};
use crate::utils::db_errors::conflict_on_account;

/// Profile fields written alongside the account.
#[derive(Debug, Default)]
pub struct ProfileFields {
    pub contact: Option<String>,
    pub address: Option<String>,
    pub birthday: Option<NaiveDate>,
}

pub struct UserService;

impl UserService {
    /// Inserts a user and its profile on `conn`, returning the profile id.
    #[instrument(skip(conn, user, fields), fields(db.operation = "INSERT", db.table = "users", user.username = %user.username))]
    pub async fn insert_account(
        conn: &mut PgConnection,
        user: &CreateUserDto,
        fields: ProfileFields,
        user_type: UserType,
        is_staff: bool,
    ) -> Result<Uuid, AppError> {
        let hashed_password = hash_password(&user.password)?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO users (username, email, password, first_name, last_name, is_staff)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&hashed_password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(is_staff)
        .fetch_one(&mut *conn)
        .await
        .map_err(conflict_on_account)?;

        let profile_id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO profiles (user_id, contact, address, birthday, user_type)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(user_id)
        .bind(&fields.contact)
        .bind(&fields.address)
        .bind(fields.birthday)
        .bind(user_type)
        .fetch_one(&mut *conn)
        .await?;

        info!(user.id = %user_id, profile.id = %profile_id, user_type = %user_type, "Account created");
        Ok(profile_id)
    }

    #[instrument(skip(conn), fields(db.operation = "SELECT", db.table = "profiles"))]
    pub async fn get_profile_by_id(
        conn: &mut PgConnection,
        profile_id: Uuid,
    ) -> Result<Profile, AppError> {
        let query = format!(
            "SELECT {} FROM profiles p JOIN users u ON u.id = p.user_id WHERE p.id = $1",
            PROFILE_COLUMNS
        );

        let row = sqlx::query_as::<_, ProfileRow>(&query)
            .bind(profile_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Profile not found")))?;

        Ok(row.into())
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "profiles"))]
    pub async fn get_profile_by_user(db: &PgPool, user_id: Uuid) -> Result<Profile, AppError> {
        let query = format!(
            "SELECT {} FROM profiles p JOIN users u ON u.id = p.user_id WHERE p.user_id = $1",
            PROFILE_COLUMNS
        );

        let row = sqlx::query_as::<_, ProfileRow>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Profile not found")))?;

        Ok(row.into())
    }

    /// Applies a partial profile update. Username, type and password are not touched.
    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "profiles"))]
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<Profile, AppError> {
        let existing = Self::get_profile_by_user(db, user_id).await?;
        let user_dto = dto.user.unwrap_or_default();

        let email = user_dto.email.unwrap_or(existing.user.email);
        let first_name = user_dto.first_name.unwrap_or(existing.user.first_name);
        let last_name = user_dto.last_name.unwrap_or(existing.user.last_name);
        let contact = dto.contact.or(existing.contact);
        let address = dto.address.or(existing.address);
        let birthday = dto.birthday.or(existing.birthday);

        let mut tx = db.begin().await?;

        sqlx::query(
            r#"UPDATE users SET email = $1, first_name = $2, last_name = $3, updated_at = NOW()
               WHERE id = $4"#,
        )
        .bind(&email)
        .bind(&first_name)
        .bind(&last_name)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(conflict_on_account)?;

        sqlx::query(
            r#"UPDATE profiles SET contact = $1, address = $2, birthday = $3, updated_at = NOW()
               WHERE id = $4"#,
        )
        .bind(&contact)
        .bind(&address)
        .bind(birthday)
        .bind(existing.id)
        .execute(&mut *tx)
        .await?;

        let profile = Self::get_profile_by_id(&mut tx, existing.id).await?;
        tx.commit().await?;

        Ok(profile)
    }
}
