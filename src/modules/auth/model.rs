pub use creche_models::auth::*;
pub use creche_models::users::{ChangePasswordDto, Profile, RegisterDto, UserCredentials};
