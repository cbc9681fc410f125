//! Session resolution: turn the cookie-borne token into a verified identity.
//!
//! Every call verifies against the backend; nothing is cached between
//! requests. Any failure along the way (missing cookie, rejected token,
//! unreachable backend, malformed payload) resolves to "no session".

use crate::config::SessionConfig;
use axum::http::{header, HeaderMap};
use axum_extra::extract::CookieJar;
use juno_common::models::auth::{Session, VerifiedUser};
use juno_sdk::JunoBackend;

/// Token from the session cookie, if present and non-empty.
pub fn cookie_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Token from `Authorization: Bearer <token>`, if present and non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Cookie first, then bearer header.
pub fn request_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    cookie_token(headers, cookie_name).or_else(|| bearer_token(headers))
}

/// Ask the backend who `token` belongs to.
#[tracing::instrument(skip_all)]
pub async fn verify_token(backend: &dyn JunoBackend, token: &str) -> Option<VerifiedUser> {
    match backend.test_auth(token).await {
        Ok(check) if check.valid => {
            if check.user.is_none() {
                tracing::warn!("Token verification reported valid but carried no user");
            }
            check.user
        }
        Ok(_) => {
            tracing::debug!("Backend rejected session token");
            None
        }
        Err(e) => {
            tracing::warn!("Session token verification failed: {}", e);
            None
        }
    }
}

/// Resolve a session for an already-extracted token.
pub async fn resolve_token(backend: &dyn JunoBackend, token: String) -> Option<Session> {
    let user = verify_token(backend, &token).await?;
    Some(Session { jwt: token, user })
}

/// Resolve the session for an inbound request.
pub async fn resolve(
    backend: &dyn JunoBackend,
    headers: &HeaderMap,
    cookie_name: &str,
) -> Option<Session> {
    let token = request_token(headers, cookie_name)?;
    resolve_token(backend, token).await
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(config: &SessionConfig, token: &str) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
        config.cookie_name,
        token,
        config.max_age_secs,
        if config.secure { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` value clearing the session.
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0{}",
        config.cookie_name,
        if config.secure { "; Secure" } else { "" }
    )
}
