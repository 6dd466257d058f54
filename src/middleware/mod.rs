//! Request extractors for authentication and user-type checks.
//!
//! - [`auth`]: [`auth::AuthUser`] and the `Require*` extractors
//! - [`role`]: user-type predicates
//!
//! ```ignore
//! async fn create_child(RequireParent(auth_user): RequireParent) -> impl IntoResponse {
//!     // only reached by parents
//! }
//! ```

pub mod auth;
pub mod role;
