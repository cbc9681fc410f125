mod common;

use common::*;
use http::{header, HeaderMap, HeaderValue};
use juno_common::models::auth::Role;
use juno_dashboard::session;

fn cookie(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("jwt-token={}", token)).unwrap(),
    );
    headers
}

#[tokio::test]
async fn test_resolve_valid_cookie() {
    let backend = FakeBackend::default();
    let session = session::resolve(&backend, &cookie(ADMIN_TOKEN), "jwt-token")
        .await
        .unwrap();
    assert_eq!(session.jwt, ADMIN_TOKEN);
    assert_eq!(session.user.role, Role::Admin);
    assert!(session.user.project_ids.contains(&11));
}

#[tokio::test]
async fn test_resolve_fails_closed() {
    let backend = FakeBackend::default();
    assert!(session::resolve(&backend, &HeaderMap::new(), "jwt-token")
        .await
        .is_none());
    assert!(session::resolve(&backend, &cookie("unknown"), "jwt-token")
        .await
        .is_none());
    assert!(session::resolve(&backend, &cookie(BROKEN_TOKEN), "jwt-token")
        .await
        .is_none());
    // The missing-cookie case never reaches the backend
    assert_eq!(backend.auth_call_count(), 2);
}

#[tokio::test]
async fn test_resolve_is_not_cached() {
    let backend = FakeBackend::default();
    for _ in 0..3 {
        assert!(session::resolve(&backend, &cookie(ROOT_TOKEN), "jwt-token")
            .await
            .is_some());
    }
    assert_eq!(backend.auth_call_count(), 3);
}

#[tokio::test]
async fn test_verify_token_roles() {
    let backend = FakeBackend::default();
    let user = session::verify_token(&backend, USER_TOKEN).await.unwrap();
    assert_eq!(user.role, Role::User);
    assert_eq!(user.id, 3);
    let root = session::verify_token(&backend, ROOT_TOKEN).await.unwrap();
    assert_eq!(root.role, Role::SuperAdmin);
}
