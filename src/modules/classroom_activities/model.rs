pub use creche_models::activities::{
    ActivityFilterParams, ClassroomActivity, CreateClassroomActivityDto,
    PaginatedClassroomActivitiesResponse, UpdateClassroomActivityDto, check_slot,
};
