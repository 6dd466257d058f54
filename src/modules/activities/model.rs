pub use creche_models::activities::{
    Activity, ActivityFilterParams, ActivityType, CreateActivityDto, PaginatedActivitiesResponse,
    UpdateActivityDto,
};
