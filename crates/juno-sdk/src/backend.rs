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

pub type SdkResult<T> = Result<T, SdkError>;

/// Operations the dashboard forwards to the Juno backend.
///
/// Methods taking `jwt` act on behalf of the signed-in user; the backend
/// enforces its own authorization on top of the dashboard's checks.
#[async_trait]
pub trait JunoBackend: Send + Sync {
    /// `GET /auth/test-auth`
    async fn test_auth(&self, token: &str) -> SdkResult<TokenCheck>;

    /// Exchange credentials for a session token.
    async fn login(&self, email: &str, password: &str) -> SdkResult<String>;

    async fn list_users(&self, jwt: &str) -> SdkResult<Vec<User>>;
    async fn create_user(&self, jwt: &str, user: &NewUser) -> SdkResult<User>;
    async fn update_user(&self, jwt: &str, id: i64, update: &UserUpdate) -> SdkResult<User>;
    async fn delete_user(&self, jwt: &str, id: i64) -> SdkResult<()>;
    async fn link_user_projects(&self, jwt: &str, user_id: i64, project_ids: &[i64])
        -> SdkResult<()>;
    async fn unlink_user_project(&self, jwt: &str, user_id: i64, project_id: i64)
        -> SdkResult<()>;

    async fn list_projects(&self, jwt: &str) -> SdkResult<Vec<Project>>;
    async fn create_project(&self, jwt: &str, project: &NewProject) -> SdkResult<Project>;
    async fn update_project(&self, jwt: &str, id: i64, update: &ProjectUpdate)
        -> SdkResult<Project>;
    async fn delete_project(&self, jwt: &str, id: i64) -> SdkResult<()>;

    async fn list_api_keys(&self, jwt: &str, project_id: i64) -> SdkResult<Vec<ApiKey>>;
    async fn create_api_key(&self, jwt: &str, key: &NewApiKey) -> SdkResult<CreatedApiKey>;
    async fn delete_api_key(&self, jwt: &str, project_id: i64, id: i64) -> SdkResult<()>;

    /// `None` when the project has no email configuration yet.
    async fn get_email_config(&self, jwt: &str, project_id: i64)
        -> SdkResult<Option<EmailConfig>>;
    async fn put_email_config(&self, jwt: &str, config: &EmailConfig) -> SdkResult<EmailConfig>;
    async fn delete_email_config(&self, jwt: &str, project_id: i64) -> SdkResult<()>;
    /// Returns the DNS records the caller has to publish for the domain.
    async fn register_domain(
        &self,
        jwt: &str,
        registration: &DomainRegistration,
    ) -> SdkResult<serde_json::Value>;
    async fn register_sender(&self, jwt: &str, registration: &SenderRegistration)
        -> SdkResult<()>;

    /// `None` when the project has no storage configuration yet.
    async fn get_storage_config(&self, jwt: &str, project_id: i64)
        -> SdkResult<Option<StorageConfig>>;
    async fn put_storage_config(&self, jwt: &str, config: &StorageConfig)
        -> SdkResult<StorageConfig>;
    async fn delete_storage_config(&self, jwt: &str, project_id: i64) -> SdkResult<()>;
    async fn list_buckets(&self, jwt: &str, project_id: i64) -> SdkResult<Vec<Bucket>>;
    async fn create_bucket(&self, jwt: &str, project_id: i64, name: &str) -> SdkResult<Bucket>;
    async fn delete_bucket(&self, jwt: &str, project_id: i64, name: &str) -> SdkResult<()>;

    /// `GET /email/analytics`, authenticated with the platform API key.
    async fn email_analytics(&self, query: &AnalyticsQuery) -> SdkResult<serde_json::Value>;
}
