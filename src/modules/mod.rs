pub mod activities;
pub mod assistants;
pub mod auth;
pub mod children;
pub mod classroom_activities;
pub mod classrooms;
pub mod groups;
pub mod my_subscriptions;
pub mod nurseries;
pub mod plans;
pub mod public_nurseries;
pub mod subscriptions;
pub mod users;
