pub use creche_models::plans::*;
