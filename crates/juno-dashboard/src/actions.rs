//! Uniform result envelope for server actions.
//!
//! Success renders as `{"success": true, "data": ...}`, failure as
//! `{"success": false, "error": "..."}` with a matching HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use juno_sdk::SdkError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    /// No session, or the token did not verify.
    #[error("Unauthorized")]
    Unauthenticated,

    /// Session present but lacking the required role or project scope.
    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid email or password")]
    LoginFailed,

    #[error("{0}")]
    Invalid(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Backend call failed. Only `context` reaches the caller.
    #[error("{context}")]
    Upstream {
        context: &'static str,
        #[source]
        source: SdkError,
    },
}

impl ActionError {
    pub fn invalid(err: anyhow::Error) -> Self {
        ActionError::Invalid(err.to_string())
    }

    /// Map an SDK failure, logging the underlying error.
    pub fn upstream(context: &'static str) -> impl FnOnce(SdkError) -> ActionError {
        move |source| {
            tracing::error!("{}: {}", context, source);
            ActionError::Upstream { context, source }
        }
    }

    /// Like [`ActionError::upstream`], but a backend 404 becomes `NotFound(entity)`.
    pub fn upstream_or_missing(
        context: &'static str,
        entity: &'static str,
    ) -> impl FnOnce(SdkError) -> ActionError {
        move |source| {
            if source.is_not_found() {
                ActionError::NotFound(entity)
            } else {
                ActionError::upstream(context)(source)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ActionError::Unauthenticated | ActionError::LoginFailed => StatusCode::UNAUTHORIZED,
            ActionError::Forbidden => StatusCode::FORBIDDEN,
            ActionError::Invalid(_) => StatusCode::BAD_REQUEST,
            ActionError::NotFound(_) => StatusCode::NOT_FOUND,
            ActionError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(json!({"success": false, "error": self.to_string()})),
        )
            .into_response()
    }
}

/// Successful action payload.
#[derive(Debug)]
pub struct ActionReply<T>(pub T);

impl<T: Serialize> IntoResponse for ActionReply<T> {
    fn into_response(self) -> Response {
        Json(json!({"success": true, "data": self.0})).into_response()
    }
}

pub type ActionResult<T> = Result<ActionReply<T>, ActionError>;

pub fn ok<T>(data: T) -> ActionResult<T> {
    Ok(ActionReply(data))
}

/// Return `Forbidden` unless `allowed`.
pub fn ensure(allowed: bool) -> Result<(), ActionError> {
    if allowed {
        Ok(())
    } else {
        Err(ActionError::Forbidden)
    }
}
