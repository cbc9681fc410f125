pub mod account_requests;
pub mod actions;
pub mod authz;
pub mod bulk;
pub mod config;
pub mod session;
pub mod state;
pub mod web;
