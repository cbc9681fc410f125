use crate::actions::{ok, ActionError, ActionResult};
use crate::bulk::{self, BulkOutcome, BulkRequest};
use crate::state::AppState;
use crate::web::api::middleware::SessionUser;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use juno_common::models::api_key::{ApiKey, CreatedApiKey, KeyEnvironment, NewApiKey};
use juno_common::validation;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    pub description: String,
    pub environment: KeyEnvironment,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectScope {
    pub project_id: i64,
}

/// GET /api/projects/{id}/api-keys
#[tracing::instrument(skip(state, auth))]
pub async fn list_api_keys(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
) -> ActionResult<Vec<ApiKey>> {
    auth.require_project(project_id)?;
    let keys = state
        .backend
        .list_api_keys(auth.jwt(), project_id)
        .await
        .map_err(ActionError::upstream("Failed to list API keys"))?;
    ok(keys)
}

/// POST /api/projects/{id}/api-keys - the raw key is only in this response
#[tracing::instrument(skip(state, auth, req))]
pub async fn create_api_key(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
    Json(req): Json<CreateKeyRequest>,
) -> ActionResult<CreatedApiKey> {
    auth.require_project(project_id)?;
    let new_key = NewApiKey {
        project_id,
        description: req.description.trim().to_string(),
        environment: req.environment,
    };
    validation::validate_new_api_key(&new_key).map_err(ActionError::invalid)?;

    let created = state
        .backend
        .create_api_key(auth.jwt(), &new_key)
        .await
        .map_err(ActionError::upstream("Failed to create API key"))?;
    tracing::info!("API key {} created for project {}", created.info.id, project_id);
    ok(created)
}

/// DELETE /api/api-keys/{id}?projectId=
#[tracing::instrument(skip(state, auth))]
pub async fn delete_api_key(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(id): Path<i64>,
    Query(scope): Query<ProjectScope>,
) -> ActionResult<i64> {
    auth.require_project(scope.project_id)?;
    state
        .backend
        .delete_api_key(auth.jwt(), scope.project_id, id)
        .await
        .map_err(ActionError::upstream_or_missing(
            "Failed to delete API key",
            "API key",
        ))?;
    ok(id)
}

/// POST /api/projects/{id}/api-keys/bulk-delete
#[tracing::instrument(skip(state, auth, req))]
pub async fn bulk_delete_api_keys(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
    Json(req): Json<BulkRequest>,
) -> Result<BulkOutcome, ActionError> {
    auth.require_project(project_id)?;
    let backend = state.backend.as_ref();
    let jwt = auth.jwt();

    Ok(bulk::run_all(&req.ids, |id| async move {
        backend
            .delete_api_key(jwt, project_id, id)
            .await
            .map_err(ActionError::upstream_or_missing(
                "Failed to delete API key",
                "API key",
            ))
    })
    .await)
}
