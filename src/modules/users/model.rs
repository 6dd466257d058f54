pub use creche_models::users::*;
