use crate::actions::{ok, ActionError, ActionResult};
use crate::state::AppState;
use crate::web::api::middleware::SessionUser;
use axum::{
    extract::{Path, State},
    Json,
};
use juno_common::models::services::{Bucket, StorageConfig};
use juno_common::validation;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfigRequest {
    pub provider: String,
    #[serde(default)]
    pub bucket_prefix: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BucketRequest {
    pub name: String,
}

/// GET /api/projects/{id}/storage - `null` when not configured
#[tracing::instrument(skip(state, auth))]
pub async fn get_storage_config(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
) -> ActionResult<Option<StorageConfig>> {
    auth.require_admin_of(project_id)?;
    let config = state
        .backend
        .get_storage_config(auth.jwt(), project_id)
        .await
        .map_err(ActionError::upstream("Failed to load storage configuration"))?;
    ok(config)
}

/// PUT /api/projects/{id}/storage
#[tracing::instrument(skip(state, auth))]
pub async fn put_storage_config(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
    Json(req): Json<StorageConfigRequest>,
) -> ActionResult<StorageConfig> {
    auth.require_admin_of(project_id)?;
    let config = StorageConfig {
        project_id,
        provider: req.provider.trim().to_lowercase(),
        bucket_prefix: req.bucket_prefix,
        region: req.region,
    };
    validation::validate_storage_config(&config).map_err(ActionError::invalid)?;

    let saved = state
        .backend
        .put_storage_config(auth.jwt(), &config)
        .await
        .map_err(ActionError::upstream("Failed to save storage configuration"))?;
    tracing::info!("Storage configuration saved for project {}", project_id);
    ok(saved)
}

/// DELETE /api/projects/{id}/storage
#[tracing::instrument(skip(state, auth))]
pub async fn delete_storage_config(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
) -> ActionResult<i64> {
    auth.require_admin_of(project_id)?;
    state
        .backend
        .delete_storage_config(auth.jwt(), project_id)
        .await
        .map_err(ActionError::upstream_or_missing(
            "Failed to delete storage configuration",
            "Storage configuration",
        ))?;
    ok(project_id)
}

/// GET /api/projects/{id}/storage/buckets
#[tracing::instrument(skip(state, auth))]
pub async fn list_buckets(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
) -> ActionResult<Vec<Bucket>> {
    auth.require_admin_of(project_id)?;
    let buckets = state
        .backend
        .list_buckets(auth.jwt(), project_id)
        .await
        .map_err(ActionError::upstream("Failed to list buckets"))?;
    ok(buckets)
}

/// POST /api/projects/{id}/storage/buckets
#[tracing::instrument(skip(state, auth))]
pub async fn create_bucket(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
    Json(req): Json<BucketRequest>,
) -> ActionResult<Bucket> {
    auth.require_admin_of(project_id)?;
    let name = req.name.trim();
    validation::validate_bucket_name(name).map_err(ActionError::invalid)?;

    let bucket = state
        .backend
        .create_bucket(auth.jwt(), project_id, name)
        .await
        .map_err(ActionError::upstream("Failed to create bucket"))?;
    ok(bucket)
}

/// DELETE /api/projects/{id}/storage/buckets/{name}
#[tracing::instrument(skip(state, auth))]
pub async fn delete_bucket(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path((project_id, name)): Path<(i64, String)>,
) -> ActionResult<String> {
    auth.require_admin_of(project_id)?;
    validation::validate_bucket_name(&name).map_err(ActionError::invalid)?;
    state
        .backend
        .delete_bucket(auth.jwt(), project_id, &name)
        .await
        .map_err(ActionError::upstream_or_missing("Failed to delete bucket", "Bucket"))?;
    ok(name)
}
