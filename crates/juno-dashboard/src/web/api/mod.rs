pub mod account_requests;
pub mod analytics;
pub mod api_keys;
pub mod auth;
pub mod email;
pub mod middleware;
pub mod projects;
pub mod storage;
pub mod users;

use crate::state::AppState;
use crate::web::guard::LOGIN_PATH;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// GET /api/config -- public endpoint returning settings the UI needs
async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "loginPath": LOGIN_PATH,
        "cookieName": state.config.session.cookie_name,
    }))
}

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Public config endpoint
        .route("/config", get(get_config))
        // Auth routes
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/bulk-delete", post(users::bulk_delete_users))
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/users/{id}/projects", post(users::link_projects))
        .route(
            "/users/{id}/projects/{project_id}",
            delete(users::unlink_project),
        )
        // Projects
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route("/projects/bulk-delete", post(projects::bulk_delete_projects))
        .route(
            "/projects/{id}",
            put(projects::update_project).delete(projects::delete_project),
        )
        // API keys (project-scoped)
        .route(
            "/projects/{id}/api-keys",
            get(api_keys::list_api_keys).post(api_keys::create_api_key),
        )
        .route(
            "/projects/{id}/api-keys/bulk-delete",
            post(api_keys::bulk_delete_api_keys),
        )
        .route("/api-keys/{id}", delete(api_keys::delete_api_key))
        // Email service
        .route(
            "/projects/{id}/email",
            get(email::get_email_config)
                .put(email::put_email_config)
                .delete(email::delete_email_config),
        )
        .route("/projects/{id}/email/domains", post(email::register_domain))
        .route("/projects/{id}/email/senders", post(email::register_sender))
        // Storage service
        .route(
            "/projects/{id}/storage",
            get(storage::get_storage_config)
                .put(storage::put_storage_config)
                .delete(storage::delete_storage_config),
        )
        .route(
            "/projects/{id}/storage/buckets",
            get(storage::list_buckets).post(storage::create_bucket),
        )
        .route(
            "/projects/{id}/storage/buckets/{name}",
            delete(storage::delete_bucket),
        )
        // Analytics
        .route("/analytics/email", get(analytics::email_analytics))
        // Account requests
        .route(
            "/account-requests",
            get(account_requests::list_requests).post(account_requests::submit_request),
        )
        .route(
            "/account-requests/{id}/approve",
            post(account_requests::approve_request),
        )
        .route(
            "/account-requests/{id}",
            delete(account_requests::reject_request),
        )
        .with_state(state)
}
