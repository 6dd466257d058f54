pub use creche_models::plans::Plan;
pub use creche_models::subscriptions::{
    CreateSubscriptionDto, DetailObject, DetailRow, PaginatedSubscriptionsResponse, Subscription,
    SubscriptionDetailDto, SubscriptionFilterParams, SubscriptionResponse, UpdateSubscriptionDto,
    check_period,
};
