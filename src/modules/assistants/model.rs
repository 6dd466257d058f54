pub use creche_models::assistants::*;
