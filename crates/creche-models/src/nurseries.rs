//! Nursery domain models and DTOs.
//!
//! A nursery is owned by exactly one manager profile. Document columns hold
//! storage keys; responses turn them into public URLs.

use chrono::{DateTime, Utc};
use creche_core::serde::{deserialize_optional_number, deserialize_optional_string};
use creche_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::opening_hours::OpeningHour;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LegalStatus {
    Agreed,
    #[default]
    Pending,
    Community,
    Other,
}

#[derive(Debug, Clone, FromRow)]
pub struct Nursery {
    pub id: Uuid,
    pub upload_folder: Uuid,
    pub manager_id: Uuid,
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub information: Option<String>,
    pub max_age: i32,
    pub max_children_per_class: i32,
    pub legal_status: LegalStatus,
    pub agreement_document: Option<String>,
    pub id_card_document: Option<String>,
    pub photo_exterior: Option<String>,
    pub photo_interior: Option<String>,
    pub verified: bool,
    pub online: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Nursery {
    pub fn document(&self, kind: DocumentKind) -> Option<&str> {
        match kind {
            DocumentKind::AgreementDocument => self.agreement_document.as_deref(),
            DocumentKind::IdCardDocument => self.id_card_document.as_deref(),
            DocumentKind::PhotoExterior => self.photo_exterior.as_deref(),
            DocumentKind::PhotoInterior => self.photo_interior.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ManagerSummary {
    /// Profile id
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NurseryResponse {
    pub id: Uuid,
    pub upload_folder: Uuid,
    pub manager: ManagerSummary,
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub information: Option<String>,
    pub max_age: i32,
    pub max_children_per_class: i32,
    pub legal_status: LegalStatus,
    pub agreement_document: Option<String>,
    pub id_card_document: Option<String>,
    pub photo_exterior: Option<String>,
    pub photo_interior: Option<String>,
    pub verified: bool,
    pub online: bool,
    pub opening_hours: Vec<OpeningHour>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateNurseryDto {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, max = 15, message = "contact_number must be 1-15 characters"))]
    pub contact_number: String,
    pub information: Option<String>,
    #[validate(range(min = 0, message = "max_age cannot be negative"))]
    pub max_age: i32,
    #[validate(range(min = 0, message = "max_children_per_class cannot be negative"))]
    pub max_children_per_class: i32,
    pub legal_status: Option<LegalStatus>,
    pub online: Option<bool>,
}

/// Partial update. `verified` and the manager are not writable here.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateNurseryDto {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "address cannot be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 15, message = "contact_number must be 1-15 characters"))]
    pub contact_number: Option<String>,
    pub information: Option<String>,
    #[validate(range(min = 0, message = "max_age cannot be negative"))]
    pub max_age: Option<i32>,
    #[validate(range(min = 0, message = "max_children_per_class cannot be negative"))]
    pub max_children_per_class: Option<i32>,
    pub legal_status: Option<LegalStatus>,
    pub online: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyNurseryDto {
    pub verified: bool,
}

/// Uploadable nursery files. The path segment is the snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    AgreementDocument,
    IdCardDocument,
    PhotoExterior,
    PhotoInterior,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgreementDocument => "agreement_document",
            Self::IdCardDocument => "id_card_document",
            Self::PhotoExterior => "photo_exterior",
            Self::PhotoInterior => "photo_interior",
        }
    }

    pub fn is_photo(&self) -> bool {
        matches!(self, Self::PhotoExterior | Self::PhotoInterior)
    }

    /// Sub-folder under the nursery's upload folder.
    pub fn folder(&self) -> &'static str {
        if self.is_photo() { "images" } else { "doc" }
    }

    /// Maps an upload content type to a file extension, if accepted for this kind.
    pub fn extension_for(&self, content_type: &str) -> Option<&'static str> {
        match content_type {
            "image/png" => Some("png"),
            "image/jpeg" | "image/jpg" => Some("jpg"),
            "image/webp" => Some("webp"),
            "application/pdf" if !self.is_photo() => Some("pdf"),
            _ => None,
        }
    }

    /// Storage key `nurseries/{folder}/{doc|images}/{kind}-{stamp}.{ext}`.
    pub fn storage_key(&self, upload_folder: Uuid, stamp: i64, extension: &str) -> String {
        format!(
            "nurseries/{}/{}/{}-{}.{}",
            upload_folder,
            self.folder(),
            self.as_str(),
            stamp,
            extension
        )
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agreement_document" => Ok(Self::AgreementDocument),
            "id_card_document" => Ok(Self::IdCardDocument),
            "photo_exterior" => Ok(Self::PhotoExterior),
            "photo_interior" => Ok(Self::PhotoInterior),
            other => Err(format!("Unknown document kind '{}'", other)),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct NurseryFilterParams {
    /// Case-insensitive substring of the name
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedNurseriesResponse {
    pub data: Vec<NurseryResponse>,
    pub meta: PaginationMeta,
}

/// Filters of the public directory.
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PublicNurseryFilterParams {
    /// Case-insensitive substring of the name
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    /// Prefix of the address
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub address: Option<String>,
    /// Only nurseries accepting children up to at least this age (months)
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub max_age: Option<i32>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NurseryBasic {
    pub id: Uuid,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedNurseryBasicResponse {
    pub data: Vec<NurseryBasic>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicNurseryDetail {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub legal_status: LegalStatus,
    pub max_age: i32,
    pub max_children_per_class: i32,
    pub photo_exterior: Option<String>,
    pub photo_interior: Option<String>,
    pub opening_hours: Vec<OpeningHour>,
    pub information: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> CreateNurseryDto {
        CreateNurseryDto {
            name: "Les Petits Loups".to_string(),
            address: "12 rue des Lilas".to_string(),
            contact_number: "0612345678".to_string(),
            information: None,
            max_age: 36,
            max_children_per_class: 12,
            legal_status: None,
            online: None,
        }
    }

    #[test]
    fn test_create_nursery_dto_validation() {
        assert!(create_dto().validate().is_ok());

        let mut dto = create_dto();
        dto.name = String::new();
        assert!(dto.validate().is_err());

        let mut dto = create_dto();
        dto.contact_number = "0".repeat(16);
        assert!(dto.validate().is_err());

        let mut dto = create_dto();
        dto.max_age = -1;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdateNurseryDto::default().validate().is_ok());
    }

    #[test]
    fn test_legal_status_defaults_to_pending() {
        assert_eq!(LegalStatus::default(), LegalStatus::Pending);
        let status: LegalStatus = serde_json::from_str(r#""community""#).unwrap();
        assert_eq!(status, LegalStatus::Community);
    }

    #[test]
    fn test_document_kind_parsing() {
        assert_eq!(
            "photo_exterior".parse::<DocumentKind>().unwrap(),
            DocumentKind::PhotoExterior
        );
        assert!("passport".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_photos_reject_pdf() {
        assert_eq!(DocumentKind::PhotoInterior.extension_for("application/pdf"), None);
        assert_eq!(
            DocumentKind::AgreementDocument.extension_for("application/pdf"),
            Some("pdf")
        );
        assert_eq!(DocumentKind::PhotoInterior.extension_for("image/webp"), Some("webp"));
        assert_eq!(DocumentKind::IdCardDocument.extension_for("text/plain"), None);
    }

    #[test]
    fn test_storage_key_layout() {
        let folder = Uuid::nil();
        assert_eq!(
            DocumentKind::PhotoExterior.storage_key(folder, 1700000000, "png"),
            "nurseries/00000000-0000-0000-0000-000000000000/images/photo_exterior-1700000000.png"
        );
        assert_eq!(
            DocumentKind::IdCardDocument.storage_key(folder, 1, "pdf"),
            "nurseries/00000000-0000-0000-0000-000000000000/doc/id_card_document-1.pdf"
        );
    }
}
