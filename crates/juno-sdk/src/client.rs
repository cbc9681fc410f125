use crate::backend::{JunoBackend, SdkResult};
use crate::error::SdkError;
use async_trait::async_trait;
use juno_common::models::analytics::AnalyticsQuery;
use juno_common::models::api_key::{ApiKey, CreatedApiKey, NewApiKey};
use juno_common::models::auth::TokenCheck;
use juno_common::models::project::{NewProject, Project, ProjectUpdate};
use juno_common::models::services::{
    Bucket, DomainRegistration, EmailConfig, SenderRegistration, StorageConfig,
};
use juno_common::models::user::{NewUser, User, UserUpdate};
use reqwest::{IntoUrl, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// HTTP client for the Juno backend
#[derive(Clone)]
pub struct JunoClient {
    client: reqwest::Client,
    base_url: Arc<str>,
    api_key: Option<Arc<str>>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(alias = "jwt", alias = "accessToken")]
    token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkProjectsRequest<'a> {
    project_ids: &'a [i64],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBucketRequest<'a> {
    project_id: i64,
    name: &'a str,
}

impl JunoClient {
    /// Build a client bound to `base_url`. `api_key` is only needed for
    /// endpoints authenticated with the platform key (analytics).
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self, SdkError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(SdkError::Client)?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            api_key: api_key.map(Arc::from),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, bearer: &str) -> RequestBuilder {
        self.authorized(method, format!("{}{}", self.base_url, path), bearer)
    }

    fn authorized(&self, method: Method, url: impl IntoUrl, bearer: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// Base URL extended by `segments`, each encoded as exactly one path
    /// segment. Use for caller-supplied names.
    fn segment_url(&self, endpoint: &str, segments: &[&str]) -> SdkResult<Url> {
        let invalid = || SdkError::InvalidUrl {
            endpoint: endpoint.to_string(),
            base: self.base_url.to_string(),
        };
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and hand back the raw response if the status is a success.
    async fn dispatch(&self, endpoint: &str, req: RequestBuilder) -> SdkResult<reqwest::Response> {
        let response = req.send().await.map_err(|source| SdkError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read body".to_string());
            return Err(SdkError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        req: RequestBuilder,
    ) -> SdkResult<T> {
        let response = self.dispatch(endpoint, req).await?;
        let bytes = response.bytes().await.map_err(|source| SdkError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|e| SdkError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn send_empty(&self, endpoint: &str, req: RequestBuilder) -> SdkResult<()> {
        self.dispatch(endpoint, req).await?;
        Ok(())
    }

    /// Like `send_json`, but a 404 means "nothing configured".
    async fn send_optional<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        req: RequestBuilder,
    ) -> SdkResult<Option<T>> {
        match self.send_json(endpoint, req).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl JunoBackend for JunoClient {
    #[tracing::instrument(skip(self, token))]
    async fn test_auth(&self, token: &str) -> SdkResult<TokenCheck> {
        let req = self.request(Method::GET, "/auth/test-auth", token);
        self.send_json("GET /auth/test-auth", req).await
    }

    #[tracing::instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> SdkResult<String> {
        let req = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .json(&LoginRequest { email, password });
        let resp: LoginResponse = self.send_json("POST /auth/login", req).await?;
        Ok(resp.token)
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn list_users(&self, jwt: &str) -> SdkResult<Vec<User>> {
        let req = self.request(Method::GET, "/users", jwt);
        self.send_json("GET /users", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn create_user(&self, jwt: &str, user: &NewUser) -> SdkResult<User> {
        let req = self.request(Method::POST, "/users", jwt).json(user);
        self.send_json("POST /users", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn update_user(&self, jwt: &str, id: i64, update: &UserUpdate) -> SdkResult<User> {
        let req = self
            .request(Method::PUT, &format!("/users/{}", id), jwt)
            .json(update);
        self.send_json("PUT /users/{id}", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn delete_user(&self, jwt: &str, id: i64) -> SdkResult<()> {
        let req = self.request(Method::DELETE, &format!("/users/{}", id), jwt);
        self.send_empty("DELETE /users/{id}", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn link_user_projects(
        &self,
        jwt: &str,
        user_id: i64,
        project_ids: &[i64],
    ) -> SdkResult<()> {
        let req = self
            .request(Method::POST, &format!("/users/{}/projects", user_id), jwt)
            .json(&LinkProjectsRequest { project_ids });
        self.send_empty("POST /users/{id}/projects", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn unlink_user_project(&self, jwt: &str, user_id: i64, project_id: i64) -> SdkResult<()> {
        let req = self.request(
            Method::DELETE,
            &format!("/users/{}/projects/{}", user_id, project_id),
            jwt,
        );
        self.send_empty("DELETE /users/{id}/projects/{projectId}", req)
            .await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn list_projects(&self, jwt: &str) -> SdkResult<Vec<Project>> {
        let req = self.request(Method::GET, "/projects", jwt);
        self.send_json("GET /projects", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn create_project(&self, jwt: &str, project: &NewProject) -> SdkResult<Project> {
        let req = self.request(Method::POST, "/projects", jwt).json(project);
        self.send_json("POST /projects", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn update_project(
        &self,
        jwt: &str,
        id: i64,
        update: &ProjectUpdate,
    ) -> SdkResult<Project> {
        let req = self
            .request(Method::PUT, &format!("/projects/{}", id), jwt)
            .json(update);
        self.send_json("PUT /projects/{id}", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn delete_project(&self, jwt: &str, id: i64) -> SdkResult<()> {
        let req = self.request(Method::DELETE, &format!("/projects/{}", id), jwt);
        self.send_empty("DELETE /projects/{id}", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn list_api_keys(&self, jwt: &str, project_id: i64) -> SdkResult<Vec<ApiKey>> {
        let req = self
            .request(Method::GET, "/api-keys", jwt)
            .query(&[("projectId", project_id)]);
        self.send_json("GET /api-keys", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn create_api_key(&self, jwt: &str, key: &NewApiKey) -> SdkResult<CreatedApiKey> {
        let req = self.request(Method::POST, "/api-keys", jwt).json(key);
        self.send_json("POST /api-keys", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn delete_api_key(&self, jwt: &str, project_id: i64, id: i64) -> SdkResult<()> {
        let req = self
            .request(Method::DELETE, &format!("/api-keys/{}", id), jwt)
            .query(&[("projectId", project_id)]);
        self.send_empty("DELETE /api-keys/{id}", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn get_email_config(
        &self,
        jwt: &str,
        project_id: i64,
    ) -> SdkResult<Option<EmailConfig>> {
        let req = self.request(Method::GET, &format!("/email/config/{}", project_id), jwt);
        self.send_optional("GET /email/config/{projectId}", req)
            .await
    }

    #[tracing::instrument(skip(self, jwt, config))]
    async fn put_email_config(&self, jwt: &str, config: &EmailConfig) -> SdkResult<EmailConfig> {
        let req = self
            .request(
                Method::PUT,
                &format!("/email/config/{}", config.project_id),
                jwt,
            )
            .json(config);
        self.send_json("PUT /email/config/{projectId}", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn delete_email_config(&self, jwt: &str, project_id: i64) -> SdkResult<()> {
        let req = self.request(
            Method::DELETE,
            &format!("/email/config/{}", project_id),
            jwt,
        );
        self.send_empty("DELETE /email/config/{projectId}", req)
            .await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn register_domain(
        &self,
        jwt: &str,
        registration: &DomainRegistration,
    ) -> SdkResult<serde_json::Value> {
        let req = self
            .request(Method::POST, "/email/domain", jwt)
            .json(registration);
        self.send_json("POST /email/domain", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn register_sender(
        &self,
        jwt: &str,
        registration: &SenderRegistration,
    ) -> SdkResult<()> {
        let req = self
            .request(Method::POST, "/email/sender", jwt)
            .json(registration);
        self.send_empty("POST /email/sender", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn get_storage_config(
        &self,
        jwt: &str,
        project_id: i64,
    ) -> SdkResult<Option<StorageConfig>> {
        let req = self.request(
            Method::GET,
            &format!("/storage/config/{}", project_id),
            jwt,
        );
        self.send_optional("GET /storage/config/{projectId}", req)
            .await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn put_storage_config(
        &self,
        jwt: &str,
        config: &StorageConfig,
    ) -> SdkResult<StorageConfig> {
        let req = self
            .request(
                Method::PUT,
                &format!("/storage/config/{}", config.project_id),
                jwt,
            )
            .json(config);
        self.send_json("PUT /storage/config/{projectId}", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn delete_storage_config(&self, jwt: &str, project_id: i64) -> SdkResult<()> {
        let req = self.request(
            Method::DELETE,
            &format!("/storage/config/{}", project_id),
            jwt,
        );
        self.send_empty("DELETE /storage/config/{projectId}", req)
            .await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn list_buckets(&self, jwt: &str, project_id: i64) -> SdkResult<Vec<Bucket>> {
        let req = self
            .request(Method::GET, "/storage/buckets", jwt)
            .query(&[("projectId", project_id)]);
        self.send_json("GET /storage/buckets", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn create_bucket(&self, jwt: &str, project_id: i64, name: &str) -> SdkResult<Bucket> {
        let req = self
            .request(Method::POST, "/storage/buckets", jwt)
            .json(&CreateBucketRequest { project_id, name });
        self.send_json("POST /storage/buckets", req).await
    }

    #[tracing::instrument(skip(self, jwt))]
    async fn delete_bucket(&self, jwt: &str, project_id: i64, name: &str) -> SdkResult<()> {
        const ENDPOINT: &str = "DELETE /storage/buckets/{name}";
        let url = self.segment_url(ENDPOINT, &["storage", "buckets", name])?;
        let req = self
            .authorized(Method::DELETE, url, jwt)
            .query(&[("projectId", project_id)]);
        self.send_empty(ENDPOINT, req).await
    }

    #[tracing::instrument(skip(self))]
    async fn email_analytics(&self, query: &AnalyticsQuery) -> SdkResult<serde_json::Value> {
        const ENDPOINT: &str = "GET /email/analytics";
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| SdkError::MissingApiKey(ENDPOINT.to_string()))?;
        let req = self
            .request(Method::GET, "/email/analytics", &api_key)
            .query(&query.to_pairs());
        self.send_json(ENDPOINT, req).await
    }
}
