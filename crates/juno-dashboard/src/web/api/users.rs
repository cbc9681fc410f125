use crate::actions::{ensure, ok, ActionError, ActionResult};
use crate::authz;
use crate::bulk::{self, BulkOutcome, BulkRequest};
use crate::state::AppState;
use crate::web::api::middleware::SessionUser;
use axum::{
    extract::{Path, State},
    Json,
};
use juno_common::models::user::{NewUser, User, UserUpdate};
use juno_common::validation;
use serde::Deserialize;
use std::sync::Arc;

const SELF_DELETE: &str = "You cannot delete your own account";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkProjectsRequest {
    pub project_ids: Vec<i64>,
}

/// Fail unless account `id` exists and the session may manage it.
async fn ensure_manageable(
    state: &AppState,
    auth: &SessionUser,
    id: i64,
) -> Result<(), ActionError> {
    let users = state
        .backend
        .list_users(auth.jwt())
        .await
        .map_err(ActionError::upstream("Failed to list users"))?;
    let target = users
        .into_iter()
        .find(|u| u.id == id)
        .ok_or(ActionError::NotFound("User"))?;
    ensure(authz::can_manage_user(Some(auth.user()), &target))
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// GET /api/users
#[tracing::instrument(skip_all)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
) -> ActionResult<Vec<User>> {
    auth.require_admin()?;
    let users = state
        .backend
        .list_users(auth.jwt())
        .await
        .map_err(ActionError::upstream("Failed to list users"))?;
    ok(users)
}

/// POST /api/users
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Json(mut new_user): Json<NewUser>,
) -> ActionResult<User> {
    auth.require_admin()?;
    trim_in_place(&mut new_user.name);
    trim_in_place(&mut new_user.email);
    validation::validate_new_user(&new_user).map_err(ActionError::invalid)?;
    ensure(authz::can_assign_role(Some(auth.user()), new_user.role))?;
    for pid in &new_user.project_ids {
        auth.require_project(*pid)?;
    }

    let user = state
        .backend
        .create_user(auth.jwt(), &new_user)
        .await
        .map_err(ActionError::upstream("Failed to create user"))?;
    tracing::info!("User {} created by {}", user.email, auth.user().email);
    ok(user)
}

/// PUT /api/users/{id}
#[tracing::instrument(skip(state, auth, update))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(id): Path<i64>,
    Json(mut update): Json<UserUpdate>,
) -> ActionResult<User> {
    auth.require_admin()?;
    for field in [&mut update.name, &mut update.email].into_iter().flatten() {
        trim_in_place(field);
    }
    validation::validate_user_update(&update).map_err(ActionError::invalid)?;
    if let Some(role) = update.role {
        ensure(authz::can_assign_role(Some(auth.user()), role))?;
    }
    ensure_manageable(&state, &auth, id).await?;

    let user = state
        .backend
        .update_user(auth.jwt(), id, &update)
        .await
        .map_err(ActionError::upstream_or_missing("Failed to update user", "User"))?;
    ok(user)
}

/// DELETE /api/users/{id}
#[tracing::instrument(skip(state, auth))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(id): Path<i64>,
) -> ActionResult<i64> {
    auth.require_admin()?;
    if id == auth.user().id {
        return Err(ActionError::Invalid(SELF_DELETE.to_string()));
    }
    ensure_manageable(&state, &auth, id).await?;
    state
        .backend
        .delete_user(auth.jwt(), id)
        .await
        .map_err(ActionError::upstream_or_missing("Failed to delete user", "User"))?;
    tracing::info!("User {} deleted by {}", id, auth.user().email);
    ok(id)
}

/// POST /api/users/bulk-delete
#[tracing::instrument(skip_all)]
pub async fn bulk_delete_users(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Json(req): Json<BulkRequest>,
) -> Result<BulkOutcome, ActionError> {
    auth.require_admin()?;
    let backend = state.backend.as_ref();
    let jwt = auth.jwt();
    let actor = auth.user();
    let users = backend
        .list_users(jwt)
        .await
        .map_err(ActionError::upstream("Failed to list users"))?;
    let users = users.as_slice();

    let outcome = bulk::run_all(&req.ids, |id| async move {
        if id == actor.id {
            return Err(ActionError::Invalid(SELF_DELETE.to_string()));
        }
        let target = users
            .iter()
            .find(|u| u.id == id)
            .ok_or(ActionError::NotFound("User"))?;
        ensure(authz::can_manage_user(Some(actor), target))?;
        backend
            .delete_user(jwt, id)
            .await
            .map_err(ActionError::upstream_or_missing("Failed to delete user", "User"))
    })
    .await;
    tracing::info!(
        "Bulk user delete by {}: {} succeeded, {} failed",
        auth.user().email,
        outcome.success_count(),
        outcome.failure_count()
    );
    Ok(outcome)
}

/// POST /api/users/{id}/projects
#[tracing::instrument(skip(state, auth, req))]
pub async fn link_projects(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<LinkProjectsRequest>,
) -> ActionResult<Vec<i64>> {
    auth.require_admin()?;
    if req.project_ids.is_empty() {
        return Err(ActionError::Invalid(
            "At least one project is required".to_string(),
        ));
    }
    for pid in &req.project_ids {
        auth.require_project(*pid)?;
    }
    let users = state
        .backend
        .list_users(auth.jwt())
        .await
        .map_err(ActionError::upstream("Failed to list users"))?;
    let target = users
        .iter()
        .find(|u| u.id == id)
        .ok_or(ActionError::NotFound("User"))?;
    ensure(authz::can_assign_role(Some(auth.user()), target.role))?;

    state
        .backend
        .link_user_projects(auth.jwt(), id, &req.project_ids)
        .await
        .map_err(ActionError::upstream_or_missing(
            "Failed to link user to projects",
            "User",
        ))?;
    ok(req.project_ids)
}

/// DELETE /api/users/{id}/projects/{project_id}
#[tracing::instrument(skip(state, auth))]
pub async fn unlink_project(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path((id, project_id)): Path<(i64, i64)>,
) -> ActionResult<i64> {
    auth.require_admin_of(project_id)?;
    ensure_manageable(&state, &auth, id).await?;
    state
        .backend
        .unlink_user_project(auth.jwt(), id, project_id)
        .await
        .map_err(ActionError::upstream_or_missing(
            "Failed to unlink user from project",
            "User",
        ))?;
    ok(project_id)
}
