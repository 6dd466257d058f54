//! Admin account creation.

use creche_core::hash_password;
use creche_models::UserType;
use sqlx::PgPool;
use uuid::Uuid;

pub struct NewAdmin<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
}

/// Creates a staff account with an `admin` profile. Returns the user id.
pub async fn create_admin(
    db: &PgPool,
    admin: &NewAdmin<'_>,
) -> Result<Uuid, Box<dyn std::error::Error>> {
    let hashed_password = hash_password(admin.password)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let mut tx = db.begin().await?;

    let user_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, email, password, first_name, last_name, is_staff)
         VALUES ($1, $2, $3, $4, $5, TRUE)
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(admin.username)
    .bind(admin.email)
    .bind(&hashed_password)
    .bind(admin.first_name)
    .bind(admin.last_name)
    .fetch_optional(&mut *tx)
    .await?;

    let user_id = match user_id {
        Some(id) => id,
        None => {
            tx.rollback().await?;
            return Err("A user with this username or email already exists".into());
        }
    };

    sqlx::query("INSERT INTO profiles (user_id, user_type) VALUES ($1, $2)")
        .bind(user_id)
        .bind(UserType::Admin)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(user_id)
}
