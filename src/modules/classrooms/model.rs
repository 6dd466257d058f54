pub use creche_models::assistants::AssistantSummary;
pub use creche_models::classrooms::{
    Classroom, ClassroomFilterParams, ClassroomResponse, CreateClassroomDto,
    PaginatedClassroomsResponse, UpdateClassroomDto, check_classroom_bounds,
};
