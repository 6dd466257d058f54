pub use creche_models::nurseries::*;
pub use creche_models::opening_hours::{OpeningHour, OpeningHourDto, validate_schedule};
