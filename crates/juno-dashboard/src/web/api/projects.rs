use crate::actions::{ok, ActionError, ActionResult};
use crate::authz;
use crate::bulk::{self, BulkOutcome, BulkRequest};
use crate::state::AppState;
use crate::web::api::middleware::SessionUser;
use axum::{
    extract::{Path, State},
    Json,
};
use juno_common::models::auth::Role;
use juno_common::models::project::{NewProject, Project, ProjectUpdate};
use juno_common::validation;
use std::sync::Arc;

/// GET /api/projects - projects the caller may see
#[tracing::instrument(skip_all)]
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
) -> ActionResult<Vec<Project>> {
    let mut projects = state
        .backend
        .list_projects(auth.jwt())
        .await
        .map_err(ActionError::upstream("Failed to list projects"))?;
    projects.retain(|p| authz::has_project_access(Some(auth.user()), p.id));
    ok(projects)
}

/// POST /api/projects
#[tracing::instrument(skip_all)]
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Json(new_project): Json<NewProject>,
) -> ActionResult<Project> {
    auth.require_admin()?;
    validation::validate_new_project(&new_project).map_err(ActionError::invalid)?;

    let project = state
        .backend
        .create_project(auth.jwt(), &new_project)
        .await
        .map_err(ActionError::upstream("Failed to create project"))?;
    tracing::info!("Project '{}' ({}) created", project.name, project.id);

    // Admins only see projects they belong to; link the creator so the new
    // project does not vanish from their view.
    if auth.user().role != Role::SuperAdmin {
        if let Err(e) = state
            .backend
            .link_user_projects(auth.jwt(), auth.user().id, &[project.id])
            .await
        {
            tracing::warn!(
                "Failed to link creator {} to project {}: {}",
                auth.user().id,
                project.id,
                e
            );
        }
    }
    ok(project)
}

/// PUT /api/projects/{id}
#[tracing::instrument(skip(state, auth, update))]
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(id): Path<i64>,
    Json(update): Json<ProjectUpdate>,
) -> ActionResult<Project> {
    auth.require_admin_of(id)?;
    validation::validate_project_update(&update).map_err(ActionError::invalid)?;
    let project = state
        .backend
        .update_project(auth.jwt(), id, &update)
        .await
        .map_err(ActionError::upstream_or_missing(
            "Failed to update project",
            "Project",
        ))?;
    ok(project)
}

/// DELETE /api/projects/{id}
#[tracing::instrument(skip(state, auth))]
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(id): Path<i64>,
) -> ActionResult<i64> {
    auth.require_super_admin()?;
    state
        .backend
        .delete_project(auth.jwt(), id)
        .await
        .map_err(ActionError::upstream_or_missing(
            "Failed to delete project",
            "Project",
        ))?;
    tracing::info!("Project {} deleted by {}", id, auth.user().email);
    ok(id)
}

/// POST /api/projects/bulk-delete
#[tracing::instrument(skip_all)]
pub async fn bulk_delete_projects(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Json(req): Json<BulkRequest>,
) -> Result<BulkOutcome, ActionError> {
    auth.require_super_admin()?;
    let backend = state.backend.as_ref();
    let jwt = auth.jwt();

    let outcome = bulk::run_all(&req.ids, |id| async move {
        backend
            .delete_project(jwt, id)
            .await
            .map_err(ActionError::upstream_or_missing(
                "Failed to delete project",
                "Project",
            ))
    })
    .await;
    tracing::info!(
        "Bulk project delete: {} succeeded, {} failed",
        outcome.success_count(),
        outcome.failure_count()
    );
    Ok(outcome)
}
