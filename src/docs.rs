use creche_core::{PaginationMeta, PaginationParams};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::activities::model::{
    Activity, ActivityType, CreateActivityDto, PaginatedActivitiesResponse, UpdateActivityDto,
};
use crate::modules::assistants::model::{
    AssistantResponse, AssistantSummary, CreateAssistantDto, PaginatedAssistantsResponse,
    UpdateAssistantDto,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    ChangePasswordDto, LoginRequest, LoginResponse, LoginUser, MessageResponse, Profile,
    RefreshTokenRequest, RegisterDto, TokenPair, VerifyTokenRequest,
};
use crate::modules::children::model::{
    ChildResponse, CreateChildDto, PaginatedChildrenResponse, ParentSummary, UpdateChildDto,
};
use crate::modules::classroom_activities::model::{
    ClassroomActivity, CreateClassroomActivityDto, PaginatedClassroomActivitiesResponse,
    UpdateClassroomActivityDto,
};
use crate::modules::classrooms::model::{
    ClassroomResponse, CreateClassroomDto, PaginatedClassroomsResponse, UpdateClassroomDto,
};
use crate::modules::groups::model::{
    CreateGroupDto, GroupResponse, PaginatedGroupsResponse, UpdateGroupDto,
};
use crate::modules::my_subscriptions::model::{
    MySubscriptionResponse, PaginatedMySubscriptionsResponse,
};
use crate::modules::nurseries::controller::DocumentUpload;
use crate::modules::nurseries::model::{
    CreateNurseryDto, DocumentKind, LegalStatus, ManagerSummary, NurseryResponse, OpeningHour,
    OpeningHourDto, PaginatedNurseriesResponse, UpdateNurseryDto, VerifyNurseryDto,
};
use crate::modules::plans::model::{
    CreatePlanDto, PaginatedPlansResponse, Plan, PlanDuration, UpdatePlanDto,
};
use crate::modules::public_nurseries::model::{
    NurseryBasic, PaginatedNurseryBasicResponse, PublicNurseryDetail,
};
use crate::modules::subscriptions::model::{
    CreateSubscriptionDto, DetailObject, PaginatedSubscriptionsResponse, SubscriptionDetailDto,
    SubscriptionResponse, UpdateSubscriptionDto,
};
use crate::modules::users::model::{UpdateProfileDto, UserType};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::obtain_token,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::verify_token,
        crate::modules::auth::controller::change_password,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::nurseries::controller::create_nursery,
        crate::modules::nurseries::controller::list_nurseries,
        crate::modules::nurseries::controller::get_nursery,
        crate::modules::nurseries::controller::update_nursery,
        crate::modules::nurseries::controller::delete_nursery,
        crate::modules::nurseries::controller::verify_nursery,
        crate::modules::nurseries::controller::get_opening_hours,
        crate::modules::nurseries::controller::replace_opening_hours,
        crate::modules::nurseries::controller::upload_document,
        crate::modules::public_nurseries::controller::list_public_nurseries,
        crate::modules::public_nurseries::controller::get_public_nursery,
        crate::modules::public_nurseries::controller::list_public_plans,
        crate::modules::public_nurseries::controller::get_public_plan,
        crate::modules::assistants::controller::create_assistant,
        crate::modules::assistants::controller::list_assistants,
        crate::modules::assistants::controller::get_assistant,
        crate::modules::assistants::controller::update_assistant,
        crate::modules::assistants::controller::delete_assistant,
        crate::modules::classrooms::controller::create_classroom,
        crate::modules::classrooms::controller::list_classrooms,
        crate::modules::classrooms::controller::get_classroom,
        crate::modules::classrooms::controller::update_classroom,
        crate::modules::classrooms::controller::delete_classroom,
        crate::modules::groups::controller::create_group,
        crate::modules::groups::controller::list_groups,
        crate::modules::groups::controller::get_group,
        crate::modules::groups::controller::update_group,
        crate::modules::groups::controller::delete_group,
        crate::modules::activities::controller::create_activity,
        crate::modules::activities::controller::list_activities,
        crate::modules::activities::controller::get_activity,
        crate::modules::activities::controller::update_activity,
        crate::modules::activities::controller::delete_activity,
        crate::modules::classroom_activities::controller::create_classroom_activity,
        crate::modules::classroom_activities::controller::list_classroom_activities,
        crate::modules::classroom_activities::controller::get_classroom_activity,
        crate::modules::classroom_activities::controller::update_classroom_activity,
        crate::modules::classroom_activities::controller::delete_classroom_activity,
        crate::modules::children::controller::create_child,
        crate::modules::children::controller::list_children,
        crate::modules::children::controller::get_child,
        crate::modules::children::controller::update_child,
        crate::modules::children::controller::delete_child,
        crate::modules::plans::controller::create_plan,
        crate::modules::plans::controller::list_plans,
        crate::modules::plans::controller::get_plan,
        crate::modules::plans::controller::update_plan,
        crate::modules::plans::controller::delete_plan,
        crate::modules::subscriptions::controller::create_subscription,
        crate::modules::subscriptions::controller::list_subscriptions,
        crate::modules::subscriptions::controller::get_subscription,
        crate::modules::subscriptions::controller::update_subscription,
        crate::modules::subscriptions::controller::delete_subscription,
        crate::modules::my_subscriptions::controller::list_my_subscriptions,
        crate::modules::my_subscriptions::controller::get_my_subscription,
    ),
    components(
        schemas(
            UserType,
            Profile,
            RegisterDto,
            UpdateProfileDto,
            ChangePasswordDto,
            LoginRequest,
            LoginResponse,
            LoginUser,
            TokenPair,
            RefreshTokenRequest,
            VerifyTokenRequest,
            MessageResponse,
            ErrorResponse,
            LegalStatus,
            DocumentKind,
            DocumentUpload,
            ManagerSummary,
            NurseryResponse,
            CreateNurseryDto,
            UpdateNurseryDto,
            VerifyNurseryDto,
            PaginatedNurseriesResponse,
            OpeningHour,
            OpeningHourDto,
            NurseryBasic,
            PublicNurseryDetail,
            PaginatedNurseryBasicResponse,
            AssistantSummary,
            AssistantResponse,
            CreateAssistantDto,
            UpdateAssistantDto,
            PaginatedAssistantsResponse,
            ClassroomResponse,
            CreateClassroomDto,
            UpdateClassroomDto,
            PaginatedClassroomsResponse,
            GroupResponse,
            CreateGroupDto,
            UpdateGroupDto,
            PaginatedGroupsResponse,
            ActivityType,
            Activity,
            CreateActivityDto,
            UpdateActivityDto,
            PaginatedActivitiesResponse,
            ClassroomActivity,
            CreateClassroomActivityDto,
            UpdateClassroomActivityDto,
            PaginatedClassroomActivitiesResponse,
            ParentSummary,
            ChildResponse,
            CreateChildDto,
            UpdateChildDto,
            PaginatedChildrenResponse,
            PlanDuration,
            Plan,
            CreatePlanDto,
            UpdatePlanDto,
            PaginatedPlansResponse,
            SubscriptionDetailDto,
            DetailObject,
            SubscriptionResponse,
            CreateSubscriptionDto,
            UpdateSubscriptionDto,
            PaginatedSubscriptionsResponse,
            MySubscriptionResponse,
            PaginatedMySubscriptionsResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, tokens and password changes"),
        (name = "Profile", description = "The caller's own profile"),
        (name = "Nurseries", description = "Nursery management, documents and opening hours"),
        (name = "Directory", description = "Public directory of verified nurseries"),
        (name = "Assistants", description = "Nursery staff"),
        (name = "Classrooms", description = "Classrooms of a nursery"),
        (name = "Groups", description = "Groups inside a classroom"),
        (name = "Activities", description = "Activities offered by a nursery"),
        (name = "Classroom Activities", description = "Activity schedule of a classroom"),
        (name = "Children", description = "Children registered by parents"),
        (name = "Plans", description = "Subscription plans of a nursery"),
        (name = "Subscriptions", description = "Parent subscriptions to a plan"),
        (name = "My Subscriptions", description = "The caller's subscriptions across nurseries")
    ),
    info(
        title = "Creche API",
        version = "0.1.0",
        description = "Multi-tenant nursery administration API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_client_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.keys().all(|p| p.starts_with("/api/client/")));
        assert!(paths.contains_key("/api/client/token"));
        assert!(paths.contains_key("/api/client/nursery/{nursery_id}/opening-hours"));
        assert!(paths.contains_key(
            "/api/client/nursery/{nursery_id}/plans/{plan_id}/subscriptions/{subscription_id}"
        ));
        assert!(paths.contains_key("/api/client/mysubscriptions"));
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
