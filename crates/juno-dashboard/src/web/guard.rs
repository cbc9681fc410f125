//! Page route protection.
//!
//! Runs in front of every request. Only the dashboard pages (`/` and the
//! `/admin` tree) are gated; API routes enforce their own checks.

use crate::session;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use juno_common::models::auth::{Role, VerifiedUser};
use std::sync::Arc;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
}

pub fn is_protected_path(path: &str) -> bool {
    path == "/" || path == "/admin" || path.starts_with("/admin/")
}

/// Decide what to do with a protected page request.
pub fn decide(token_present: bool, user: Option<&VerifiedUser>) -> GuardDecision {
    if !token_present {
        return GuardDecision::RedirectToLogin;
    }
    match user {
        Some(u) if u.role != Role::User => GuardDecision::Allow,
        _ => GuardDecision::RedirectToLogin,
    }
}

pub async fn route_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !is_protected_path(request.uri().path()) {
        return next.run(request).await;
    }

    let token = session::cookie_token(request.headers(), &state.config.session.cookie_name);
    let user = match &token {
        Some(t) => session::verify_token(state.backend.as_ref(), t).await,
        None => None,
    };

    match decide(token.is_some(), user.as_ref()) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::RedirectToLogin => {
            tracing::debug!("Redirecting {} to {}", request.uri().path(), LOGIN_PATH);
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}
