use crate::actions::{ok, ActionError, ActionResult};
use crate::state::AppState;
use crate::web::api::middleware::SessionUser;
use axum::{
    extract::{Path, State},
    Json,
};
use juno_common::models::services::{DomainRegistration, EmailConfig, SenderRegistration};
use juno_common::validation;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailConfigRequest {
    pub provider: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub sender_addresses: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DomainRequest {
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub struct SenderRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// GET /api/projects/{id}/email - `null` when not configured
#[tracing::instrument(skip(state, auth))]
pub async fn get_email_config(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
) -> ActionResult<Option<EmailConfig>> {
    auth.require_admin_of(project_id)?;
    let config = state
        .backend
        .get_email_config(auth.jwt(), project_id)
        .await
        .map_err(ActionError::upstream("Failed to load email configuration"))?;
    ok(config.map(|c| c.redacted()))
}

/// PUT /api/projects/{id}/email
#[tracing::instrument(skip(state, auth, req))]
pub async fn put_email_config(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
    Json(req): Json<EmailConfigRequest>,
) -> ActionResult<EmailConfig> {
    auth.require_admin_of(project_id)?;
    let config = EmailConfig {
        project_id,
        provider: req.provider.trim().to_lowercase(),
        api_key: req.api_key.filter(|k| !k.trim().is_empty()),
        sender_addresses: req.sender_addresses,
        domains: req.domains,
    };
    validation::validate_email_config(&config).map_err(ActionError::invalid)?;

    let saved = state
        .backend
        .put_email_config(auth.jwt(), &config)
        .await
        .map_err(ActionError::upstream("Failed to save email configuration"))?;
    tracing::info!("Email configuration saved for project {}", project_id);
    ok(saved.redacted())
}

/// DELETE /api/projects/{id}/email
#[tracing::instrument(skip(state, auth))]
pub async fn delete_email_config(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
) -> ActionResult<i64> {
    auth.require_admin_of(project_id)?;
    state
        .backend
        .delete_email_config(auth.jwt(), project_id)
        .await
        .map_err(ActionError::upstream_or_missing(
            "Failed to delete email configuration",
            "Email configuration",
        ))?;
    ok(project_id)
}

/// POST /api/projects/{id}/email/domains - returns the DNS records to publish
#[tracing::instrument(skip(state, auth))]
pub async fn register_domain(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
    Json(req): Json<DomainRequest>,
) -> ActionResult<serde_json::Value> {
    auth.require_admin_of(project_id)?;
    let registration = DomainRegistration {
        project_id,
        domain: req.domain.trim().to_lowercase(),
    };
    validation::validate_domain_registration(&registration).map_err(ActionError::invalid)?;

    let records = state
        .backend
        .register_domain(auth.jwt(), &registration)
        .await
        .map_err(ActionError::upstream("Failed to register domain"))?;
    ok(records)
}

/// POST /api/projects/{id}/email/senders
#[tracing::instrument(skip(state, auth))]
pub async fn register_sender(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    Path(project_id): Path<i64>,
    Json(req): Json<SenderRequest>,
) -> ActionResult<String> {
    auth.require_admin_of(project_id)?;
    let registration = SenderRegistration {
        project_id,
        email: req.email.trim().to_string(),
        name: req.name,
    };
    validation::validate_sender_registration(&registration).map_err(ActionError::invalid)?;

    state
        .backend
        .register_sender(auth.jwt(), &registration)
        .await
        .map_err(ActionError::upstream("Failed to register sender"))?;
    ok(registration.email)
}
