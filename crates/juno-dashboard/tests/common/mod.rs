//! In-memory stand-in for the Juno backend plus request helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::Request;
use http_body_util::BodyExt;
use juno_common::models::analytics::AnalyticsQuery;
use juno_common::models::api_key::{ApiKey, CreatedApiKey, NewApiKey};
use juno_common::models::auth::{Role, TokenCheck, VerifiedUser};
use juno_common::models::project::{NewProject, Project, ProjectUpdate};
use juno_common::models::services::{
    Bucket, DomainRegistration, EmailConfig, SenderRegistration, StorageConfig,
};
use juno_common::models::user::{NewUser, User, UserUpdate};
use juno_dashboard::config::{AccountRequestSeed, BackendConfig, ServerConfig, SessionConfig};
use juno_dashboard::state::AppState;
use juno_dashboard::web::build_router;
use juno_sdk::backend::SdkResult;
use juno_sdk::{JunoBackend, SdkError};
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ROOT_TOKEN: &str = "root-token";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const USER_TOKEN: &str = "user-token";
/// Token whose verification fails with a backend error.
pub const BROKEN_TOKEN: &str = "backend-down";

pub const ROOT_EMAIL: &str = "root@juno.dev";
pub const ROOT_PASSWORD: &str = "correct-horse";

pub fn verified(id: i64, role: Role, projects: &[i64]) -> VerifiedUser {
    VerifiedUser {
        id,
        email: format!("user{}@juno.dev", id),
        name: format!("User {}", id),
        role,
        project_ids: projects.iter().copied().collect::<BTreeSet<_>>(),
    }
}

fn status(endpoint: &str, status: u16) -> SdkError {
    SdkError::Status {
        endpoint: endpoint.to_string(),
        status,
        message: "fake backend refused".to_string(),
    }
}

pub struct FakeBackend {
    tokens: HashMap<String, VerifiedUser>,
    projects: Mutex<Vec<Project>>,
    users: Mutex<Vec<User>>,
    api_keys: Mutex<Vec<ApiKey>>,
    /// Ids for which every delete fails with a 500.
    pub failing_ids: HashSet<i64>,
    pub fail_user_create: bool,
    pub auth_calls: AtomicUsize,
    pub links: Mutex<Vec<(i64, Vec<i64>)>>,
    pub unlinks: Mutex<Vec<(i64, i64)>>,
    pub deleted_buckets: Mutex<Vec<(i64, String)>>,
    pub analytics_queries: Mutex<Vec<AnalyticsQuery>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        let tokens = HashMap::from([
            (ROOT_TOKEN.to_string(), verified(1, Role::SuperAdmin, &[])),
            (ADMIN_TOKEN.to_string(), verified(2, Role::Admin, &[10, 11])),
            (USER_TOKEN.to_string(), verified(3, Role::User, &[10])),
        ]);
        let projects = [(10, "alpha"), (11, "beta"), (12, "gamma")]
            .into_iter()
            .map(|(id, name)| Project {
                id,
                name: name.to_string(),
                description: None,
            })
            .collect();
        // User 4 never logs in; it only belongs to project 12.
        let users = tokens
            .values()
            .cloned()
            .chain([verified(4, Role::User, &[12])])
            .map(|u| User {
                id: u.id,
                name: u.name,
                email: u.email,
                role: u.role,
                project_ids: u.project_ids,
            })
            .collect();
        let api_keys = (100..105)
            .map(|id| ApiKey {
                id,
                project_id: 10,
                description: format!("key {}", id),
                environment: juno_common::models::api_key::KeyEnvironment::Dev,
                prefix: None,
                created_at: None,
            })
            .collect();
        Self {
            tokens,
            projects: Mutex::new(projects),
            users: Mutex::new(users),
            api_keys: Mutex::new(api_keys),
            failing_ids: HashSet::new(),
            fail_user_create: false,
            auth_calls: AtomicUsize::new(0),
            links: Mutex::new(Vec::new()),
            unlinks: Mutex::new(Vec::new()),
            deleted_buckets: Mutex::new(Vec::new()),
            analytics_queries: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn with_failing_ids(ids: &[i64]) -> Self {
        Self {
            failing_ids: ids.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn failing_user_creation() -> Self {
        Self {
            fail_user_create: true,
            ..Self::default()
        }
    }

    pub fn auth_call_count(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn project_ids(&self) -> Vec<i64> {
        self.projects.lock().unwrap().iter().map(|p| p.id).collect()
    }

    pub fn user_emails(&self) -> Vec<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.email.clone())
            .collect()
    }

    pub fn user(&self, id: i64) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    fn check_delete(&self, endpoint: &str, id: i64) -> SdkResult<()> {
        if self.failing_ids.contains(&id) {
            return Err(status(endpoint, 500));
        }
        Ok(())
    }
}

#[async_trait]
impl JunoBackend for FakeBackend {
    async fn test_auth(&self, token: &str) -> SdkResult<TokenCheck> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        if token == BROKEN_TOKEN {
            return Err(status("GET /auth/test-auth", 503));
        }
        Ok(match self.tokens.get(token) {
            Some(user) => TokenCheck {
                valid: true,
                user: Some(user.clone()),
            },
            None => TokenCheck {
                valid: false,
                user: None,
            },
        })
    }

    async fn login(&self, email: &str, password: &str) -> SdkResult<String> {
        if email == ROOT_EMAIL && password == ROOT_PASSWORD {
            Ok(ROOT_TOKEN.to_string())
        } else {
            Err(status("POST /auth/login", 401))
        }
    }

    async fn list_users(&self, _jwt: &str) -> SdkResult<Vec<User>> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn create_user(&self, _jwt: &str, user: &NewUser) -> SdkResult<User> {
        if self.fail_user_create {
            return Err(status("POST /users", 500));
        }
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let created = User {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            project_ids: user.project_ids.iter().copied().collect(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, _jwt: &str, id: i64, update: &UserUpdate) -> SdkResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| status("PUT /users/{id}", 404))?;
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, _jwt: &str, id: i64) -> SdkResult<()> {
        self.check_delete("DELETE /users/{id}", id)?;
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(status("DELETE /users/{id}", 404));
        }
        Ok(())
    }

    async fn link_user_projects(
        &self,
        _jwt: &str,
        user_id: i64,
        project_ids: &[i64],
    ) -> SdkResult<()> {
        self.links
            .lock()
            .unwrap()
            .push((user_id, project_ids.to_vec()));
        Ok(())
    }

    async fn unlink_user_project(
        &self,
        _jwt: &str,
        user_id: i64,
        project_id: i64,
    ) -> SdkResult<()> {
        self.unlinks.lock().unwrap().push((user_id, project_id));
        Ok(())
    }

    async fn list_projects(&self, _jwt: &str) -> SdkResult<Vec<Project>> {
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn create_project(&self, _jwt: &str, project: &NewProject) -> SdkResult<Project> {
        let mut projects = self.projects.lock().unwrap();
        let id = projects.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let created = Project {
            id,
            name: project.name.clone(),
            description: project.description.clone(),
        };
        projects.push(created.clone());
        Ok(created)
    }

    async fn update_project(
        &self,
        _jwt: &str,
        id: i64,
        update: &ProjectUpdate,
    ) -> SdkResult<Project> {
        let mut projects = self.projects.lock().unwrap();
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| status("PUT /projects/{id}", 404))?;
        if let Some(name) = &update.name {
            project.name = name.clone();
        }
        if update.description.is_some() {
            project.description = update.description.clone();
        }
        Ok(project.clone())
    }

    async fn delete_project(&self, _jwt: &str, id: i64) -> SdkResult<()> {
        self.check_delete("DELETE /projects/{id}", id)?;
        let mut projects = self.projects.lock().unwrap();
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(status("DELETE /projects/{id}", 404));
        }
        Ok(())
    }

    async fn list_api_keys(&self, _jwt: &str, project_id: i64) -> SdkResult<Vec<ApiKey>> {
        Ok(self
            .api_keys
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_api_key(&self, _jwt: &str, key: &NewApiKey) -> SdkResult<CreatedApiKey> {
        let mut keys = self.api_keys.lock().unwrap();
        let id = keys.iter().map(|k| k.id).max().unwrap_or(0) + 1;
        let info = ApiKey {
            id,
            project_id: key.project_id,
            description: key.description.clone(),
            environment: key.environment,
            prefix: Some("jk_".to_string()),
            created_at: None,
        };
        keys.push(info.clone());
        Ok(CreatedApiKey {
            api_key: format!("jk_secret_{}", id),
            info,
        })
    }

    async fn delete_api_key(&self, _jwt: &str, project_id: i64, id: i64) -> SdkResult<()> {
        self.check_delete("DELETE /api-keys/{id}", id)?;
        let mut keys = self.api_keys.lock().unwrap();
        let before = keys.len();
        keys.retain(|k| !(k.id == id && k.project_id == project_id));
        if keys.len() == before {
            return Err(status("DELETE /api-keys/{id}", 404));
        }
        Ok(())
    }

    async fn get_email_config(
        &self,
        _jwt: &str,
        project_id: i64,
    ) -> SdkResult<Option<EmailConfig>> {
        Ok((project_id == 10).then(|| EmailConfig {
            project_id,
            provider: "sendgrid".to_string(),
            api_key: Some("SG.provider-secret".to_string()),
            sender_addresses: vec!["noreply@alpha.dev".to_string()],
            domains: vec!["alpha.dev".to_string()],
        }))
    }

    async fn put_email_config(&self, _jwt: &str, config: &EmailConfig) -> SdkResult<EmailConfig> {
        Ok(config.clone())
    }

    async fn delete_email_config(&self, _jwt: &str, _project_id: i64) -> SdkResult<()> {
        Ok(())
    }

    async fn register_domain(
        &self,
        _jwt: &str,
        registration: &DomainRegistration,
    ) -> SdkResult<Value> {
        Ok(json!({
            "records": [{"type": "TXT", "name": format!("_juno.{}", registration.domain)}]
        }))
    }

    async fn register_sender(
        &self,
        _jwt: &str,
        _registration: &SenderRegistration,
    ) -> SdkResult<()> {
        Ok(())
    }

    async fn get_storage_config(
        &self,
        _jwt: &str,
        _project_id: i64,
    ) -> SdkResult<Option<StorageConfig>> {
        Ok(None)
    }

    async fn put_storage_config(
        &self,
        _jwt: &str,
        config: &StorageConfig,
    ) -> SdkResult<StorageConfig> {
        Ok(config.clone())
    }

    async fn delete_storage_config(&self, _jwt: &str, _project_id: i64) -> SdkResult<()> {
        Err(status("DELETE /storage/config/{projectId}", 404))
    }

    async fn list_buckets(&self, _jwt: &str, project_id: i64) -> SdkResult<Vec<Bucket>> {
        Ok(vec![Bucket {
            name: "assets".to_string(),
            project_id,
            created_at: None,
        }])
    }

    async fn create_bucket(&self, _jwt: &str, project_id: i64, name: &str) -> SdkResult<Bucket> {
        Ok(Bucket {
            name: name.to_string(),
            project_id,
            created_at: None,
        })
    }

    async fn delete_bucket(&self, _jwt: &str, project_id: i64, name: &str) -> SdkResult<()> {
        self.deleted_buckets
            .lock()
            .unwrap()
            .push((project_id, name.to_string()));
        Ok(())
    }

    async fn email_analytics(&self, query: &AnalyticsQuery) -> SdkResult<Value> {
        self.analytics_queries.lock().unwrap().push(query.clone());
        Ok(json!({"sent": 42, "delivered": 40}))
    }
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        listen: "127.0.0.1:0".to_string(),
        backend: BackendConfig {
            base_url: Some("http://juno.invalid".to_string()),
            ..Default::default()
        },
        session: SessionConfig {
            secure: false,
            ..Default::default()
        },
        ui: None,
        cors: None,
        account_requests: vec![AccountRequestSeed {
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            password: "pending-pass".to_string(),
            user_type: Role::User,
            project_name: Some("alpha".to_string()),
        }],
        max_pending_account_requests: 2,
    }
}

pub fn setup_with(backend: FakeBackend) -> (Router, Arc<FakeBackend>) {
    let backend = Arc::new(backend);
    let state = AppState::new(backend.clone(), test_config());
    (build_router(state), backend)
}

pub fn setup() -> (Router, Arc<FakeBackend>) {
    setup_with(FakeBackend::default())
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Cookie", format!("jwt-token={}", token));
    }
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, None)
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
