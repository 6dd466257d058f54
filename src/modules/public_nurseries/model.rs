pub use creche_models::nurseries::{
    NurseryBasic, PaginatedNurseryBasicResponse, PublicNurseryDetail, PublicNurseryFilterParams,
};
pub use creche_models::plans::{PaginatedPlansResponse, Plan, PlanFilterParams};
