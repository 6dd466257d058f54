//! Shared helpers.
//!
//! - [`auth_helpers`]: nursery access resolution
//! - [`db_errors`]: constraint violation mapping

pub mod auth_helpers;
pub mod db_errors;
