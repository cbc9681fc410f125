use crate::actions::{ensure, ok, ActionError, ActionResult};
use crate::authz;
use crate::state::AppState;
use crate::web::api::middleware::SessionUser;
use axum::{
    extract::{Path, State},
    Json,
};
use juno_common::models::account_request::{AccountRequest, NewAccountRequest};
use juno_common::models::user::User;
use juno_common::validation;
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /api/account-requests
#[tracing::instrument(skip_all)]
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
) -> ActionResult<Vec<AccountRequest>> {
    auth.require_admin()?;
    ok(state.account_requests.list().await)
}

/// POST /api/account-requests - public signup form
#[tracing::instrument(skip_all)]
pub async fn submit_request(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewAccountRequest>,
) -> ActionResult<Value> {
    validation::validate_account_request(&req).map_err(ActionError::invalid)?;
    let request = state
        .account_requests
        .submit(req)
        .await
        .map_err(ActionError::invalid)?;
    tracing::info!("Account request {} submitted by {}", request.id, request.email);
    ok(json!({ "id": request.id }))
}

/// POST /api/account-requests/{id}/approve
#[tracing::instrument(skip(state, auth))]
pub async fn approve_request(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(id): Path<i64>,
) -> ActionResult<User> {
    auth.require_admin()?;
    let request = state
        .account_requests
        .get(id)
        .await
        .ok_or(ActionError::NotFound("Account request"))?;
    ensure(authz::can_assign_role(Some(auth.user()), request.user_type))?;

    let project_ids = match &request.project_name {
        Some(name) => {
            let projects = state
                .backend
                .list_projects(auth.jwt())
                .await
                .map_err(ActionError::upstream("Failed to list projects"))?;
            let project = projects
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
                .ok_or(ActionError::NotFound("Project"))?;
            auth.require_project(project.id)?;
            vec![project.id]
        }
        None => Vec::new(),
    };

    // Taken out of the queue first so a concurrent approval cannot create
    // the same account twice.
    let request = state
        .account_requests
        .remove(id)
        .await
        .ok_or(ActionError::NotFound("Account request"))?;

    match state
        .backend
        .create_user(auth.jwt(), &request.to_new_user(project_ids))
        .await
    {
        Ok(user) => {
            tracing::info!(
                "Account request {} approved by {}: user {} created",
                id,
                auth.user().email,
                user.id
            );
            ok(user)
        }
        Err(e) => {
            state.account_requests.restore(request).await;
            Err(ActionError::upstream("Failed to create user")(e))
        }
    }
}

/// DELETE /api/account-requests/{id} - reject
#[tracing::instrument(skip(state, auth))]
pub async fn reject_request(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(id): Path<i64>,
) -> ActionResult<i64> {
    auth.require_admin()?;
    let request = state
        .account_requests
        .remove(id)
        .await
        .ok_or(ActionError::NotFound("Account request"))?;
    tracing::info!(
        "Account request {} ({}) rejected by {}",
        id,
        request.email,
        auth.user().email
    );
    ok(id)
}
