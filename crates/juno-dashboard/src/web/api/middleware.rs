use crate::actions::{ensure, ActionError};
use crate::authz;
use crate::session;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use juno_common::models::auth::{Session, VerifiedUser};
use std::sync::Arc;

/// Extractor that resolves the caller's session against the backend.
/// Rejects with `401 Unauthorized` when there is none.
#[derive(Debug)]
pub struct SessionUser(pub Session);

impl FromRequestParts<Arc<AppState>> for SessionUser {
    type Rejection = ActionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        session::resolve(
            state.backend.as_ref(),
            &parts.headers,
            &state.config.session.cookie_name,
        )
        .await
        .map(SessionUser)
        .ok_or(ActionError::Unauthenticated)
    }
}

impl SessionUser {
    pub fn user(&self) -> &VerifiedUser {
        &self.0.user
    }

    /// Token to forward to the backend on the user's behalf.
    pub fn jwt(&self) -> &str {
        &self.0.jwt
    }

    pub fn require_admin(&self) -> Result<(), ActionError> {
        ensure(authz::require_admin(Some(self.user())))
    }

    pub fn require_super_admin(&self) -> Result<(), ActionError> {
        ensure(authz::require_super_admin(Some(self.user())))
    }

    pub fn require_project(&self, project_id: i64) -> Result<(), ActionError> {
        ensure(authz::has_project_access(Some(self.user()), project_id))
    }

    /// Admin role plus access to `project_id`.
    pub fn require_admin_of(&self, project_id: i64) -> Result<(), ActionError> {
        self.require_admin()?;
        self.require_project(project_id)
    }
}
