use crate::actions::{ok, ActionError, ActionReply, ActionResult};
use crate::session;
use crate::state::AppState;
use crate::web::api::middleware::SessionUser;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use juno_common::models::auth::VerifiedUser;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ActionError> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(ActionError::Invalid(
            "Email and password are required".to_string(),
        ));
    }

    let token = match state.backend.login(email, &req.password).await {
        Ok(t) => t,
        Err(e) if matches!(e.status(), Some(400 | 401 | 403)) => {
            tracing::info!("Login rejected for {}", email);
            return Err(ActionError::LoginFailed);
        }
        Err(e) => return Err(ActionError::upstream("Failed to sign in")(e)),
    };

    let user = session::verify_token(state.backend.as_ref(), &token).await;
    let cookie = session::session_cookie(&state.config.session, &token);
    tracing::info!("User signed in: {}", email);

    Ok((
        [(header::SET_COOKIE, cookie)],
        ActionReply(json!({ "user": user })),
    ))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(
            header::SET_COOKIE,
            session::clear_session_cookie(&state.config.session),
        )],
        ActionReply(()),
    )
}

/// GET /api/auth/me
pub async fn me(auth: SessionUser) -> ActionResult<VerifiedUser> {
    ok(auth.0.user)
}
