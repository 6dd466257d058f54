//! # Creche Models
//!
//! Entities and DTOs for the Creche API.
//!
//! Database rows derive `sqlx::FromRow`, request bodies derive
//! `validator::Validate`, and everything exposed over HTTP derives
//! `utoipa::ToSchema`.
//!
//! # Modules
//!
//! - [`users`]: accounts, profiles and [`UserType`]
//! - [`auth`]: token endpoint bodies
//! - [`nurseries`]: nurseries, documents and directory filters
//! - [`opening_hours`]: weekly schedule
//! - [`assistants`]: nursery staff
//! - [`classrooms`]: classrooms and groups
//! - [`activities`]: activities and classroom scheduling
//! - [`children`]: children registered by parents
//! - [`plans`]: subscription plans and [`PlanDuration`]
//! - [`subscriptions`]: subscriptions and their details

pub mod activities;
pub mod assistants;
pub mod auth;
pub mod children;
pub mod classrooms;
pub mod nurseries;
pub mod opening_hours;
pub mod plans;
pub mod subscriptions;
pub mod users;

pub use activities::{
    Activity, ActivityFilterParams, ActivityType, ClassroomActivity, CreateActivityDto,
    CreateClassroomActivityDto, PaginatedActivitiesResponse, PaginatedClassroomActivitiesResponse,
    UpdateActivityDto, UpdateClassroomActivityDto,
};

pub use assistants::{
    AssistantFilterParams, AssistantResponse, AssistantRow, AssistantSummary, CreateAssistantDto,
    PaginatedAssistantsResponse, UpdateAssistantDto,
};

pub use auth::{
    LoginRequest, LoginResponse, LoginUser, MessageResponse, RefreshTokenRequest, TokenPair,
    VerifyTokenRequest,
};

pub use children::{
    ChildFilterParams, ChildResponse, ChildRow, CreateChildDto, PaginatedChildrenResponse,
    ParentSummary, UpdateChildDto,
};

pub use classrooms::{
    Classroom, ClassroomFilterParams, ClassroomResponse, CreateClassroomDto, CreateGroupDto, Group,
    GroupFilterParams, GroupResponse, PaginatedClassroomsResponse, PaginatedGroupsResponse,
    UpdateClassroomDto, UpdateGroupDto,
};

pub use nurseries::{
    CreateNurseryDto, DocumentKind, LegalStatus, ManagerSummary, Nursery, NurseryBasic,
    NurseryFilterParams, NurseryResponse, PaginatedNurseriesResponse,
    PaginatedNurseryBasicResponse, PublicNurseryDetail, PublicNurseryFilterParams,
    UpdateNurseryDto, VerifyNurseryDto,
};

pub use opening_hours::{OpeningHour, OpeningHourDto};

pub use plans::{
    CreatePlanDto, PaginatedPlansResponse, Plan, PlanDuration, PlanFilterParams, UpdatePlanDto,
};

pub use subscriptions::{
    CreateSubscriptionDto, DetailObject, DetailRow, MySubscriptionResponse, MySubscriptionRow,
    NamedRef, PaginatedMySubscriptionsResponse, PaginatedSubscriptionsResponse, PlanSummary,
    Subscription, SubscriptionDetailDto, SubscriptionFilterParams, SubscriptionResponse,
    UpdateSubscriptionDto,
};

pub use users::{
    ChangePasswordDto, CreateUserDto, NewProfileDto, Profile, ProfileRow, RegisterDto,
    UpdateProfileDto, UpdateUserDto, User, UserCredentials, UserType,
};
