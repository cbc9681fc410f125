use crate::actions::{ok, ActionError, ActionResult};
use crate::state::AppState;
use crate::web::api::middleware::SessionUser;
use axum::extract::{rejection::QueryRejection, Query, State};
use juno_common::models::analytics::AnalyticsQuery;
use juno_common::validation;
use std::sync::Arc;

/// GET /api/analytics/email
///
/// Uses the platform API key rather than the caller's token.
#[tracing::instrument(skip_all)]
pub async fn email_analytics(
    State(state): State<Arc<AppState>>,
    auth: SessionUser,
    query: Result<Query<AnalyticsQuery>, QueryRejection>,
) -> ActionResult<serde_json::Value> {
    auth.require_admin()?;
    let Query(query) = query.map_err(|e| ActionError::Invalid(e.body_text()))?;
    validation::validate_analytics_query(&query).map_err(ActionError::invalid)?;

    let stats = state
        .backend
        .email_analytics(&query)
        .await
        .map_err(ActionError::upstream("Failed to load email analytics"))?;
    ok(stats)
}
