pub use creche_models::subscriptions::{
    MySubscriptionResponse, MySubscriptionRow, PaginatedMySubscriptionsResponse,
    SubscriptionFilterParams,
};
