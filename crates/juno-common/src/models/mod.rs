pub mod account_request;
pub mod analytics;
pub mod api_key;
pub mod auth;
pub mod project;
pub mod services;
pub mod user;
pub mod wire;
