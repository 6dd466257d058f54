//! Accounts and their role-tagged profiles.
//!
//! Every account (`users`) owns exactly one profile (`profiles`). The
//! profile's [`UserType`] is what permission checks look at.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Parent,
    NurseryAssistant,
    NurseryManager,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::NurseryAssistant => "nursery_assistant",
            Self::NurseryManager => "nursery_manager",
            Self::Admin => "admin",
        }
    }

    /// Types an anonymous visitor may pick when registering.
    pub fn is_self_registrable(&self) -> bool {
        matches!(self, Self::Parent | Self::NurseryManager)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public view of an account. The password hash never leaves the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Row used by login: account plus hash plus profile type.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub user_type: UserType,
}

/// Flat row of `profiles JOIN users`.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
}

/// Column list matching [`ProfileRow`]; expects `profiles p JOIN users u`.
pub const PROFILE_COLUMNS: &str = "p.id, p.user_id, u.username, u.email, u.first_name, \
     u.last_name, u.is_staff, p.contact, p.address, p.birthday, p.user_type, p.created_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub user: User,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub birthday: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            user: User {
                id: row.user_id,
                username: row.username,
                email: row.email,
                first_name: row.first_name,
                last_name: row.last_name,
                is_staff: row.is_staff,
            },
            contact: row.contact,
            address: row.address,
            birthday: row.birthday,
            user_type: row.user_type,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 150, message = "username must be 1-150 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub last_name: String,
}

/// Public sign-up payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_registration_type"))]
pub struct RegisterDto {
    #[validate(nested)]
    pub user: CreateUserDto,
    #[validate(length(max = 15, message = "contact must be at most 15 characters"))]
    pub contact: Option<String>,
    pub address: Option<String>,
    #[validate(custom(function = "validate_past_date"))]
    pub birthday: Option<NaiveDate>,
    /// `parent` (default) or `nursery_manager`
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
}

impl RegisterDto {
    pub fn user_type(&self) -> UserType {
        self.user_type.unwrap_or_default()
    }
}

fn validate_registration_type(dto: &RegisterDto) -> Result<(), ValidationError> {
    match dto.user_type() {
        UserType::NurseryAssistant => Err(ValidationError::new("user_type").with_message(
            "nursery assistants must be created by their nursery".into(),
        )),
        UserType::Admin => Err(ValidationError::new("user_type")
            .with_message("admin accounts cannot be self-registered".into())),
        _ => Ok(()),
    }
}

/// Profile fields shared by sign-up and assistant creation.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewProfileDto {
    #[validate(nested)]
    pub user: CreateUserDto,
    #[validate(length(max = 15, message = "contact must be at most 15 characters"))]
    pub contact: Option<String>,
    pub address: Option<String>,
    #[validate(custom(function = "validate_past_date"))]
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(nested)]
    pub user: Option<UpdateUserDto>,
    #[validate(length(max = 15, message = "contact must be at most 15 characters"))]
    pub contact: Option<String>,
    pub address: Option<String>,
    #[validate(custom(function = "validate_past_date"))]
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "old_password is required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "new password is too short"))]
    pub new_password: String,
}

pub(crate) fn validate_past_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        return Err(ValidationError::new("future_date")
            .with_message("date cannot be in the future".into()));
    }
    Ok(())
}
