pub use creche_models::classrooms::{
    CreateGroupDto, Group, GroupFilterParams, GroupResponse, PaginatedGroupsResponse,
    UpdateGroupDto,
};
