//! # Creche Core
//!
//! Foundational types shared by every crate of the Creche API:
//!
//! - [`errors`]: [`AppError`], the error type every handler returns
//! - [`pagination`]: query parameters and response metadata for list endpoints
//! - [`password`]: bcrypt hashing and verification
//! - [`serde`]: lenient query-string deserializers
//! - [`file_storage`]: storage backend abstraction for uploaded documents
//!
//! # Example
//!
//! ```ignore
//! use creche_core::{AppError, PaginationParams};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Nursery not found"));
//! let params = PaginationParams::default();
//! let meta = params.meta(42);
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use file_storage::{FileStorage, LocalFileStorage, StorageError};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
