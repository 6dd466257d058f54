pub use creche_models::children::*;
