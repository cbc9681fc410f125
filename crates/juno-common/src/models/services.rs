//! Per-project service configuration: email delivery and file storage.

use crate::models::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Email providers the backend knows how to drive.
pub const EMAIL_PROVIDERS: &[&str] = &["sendgrid", "ses", "smtp", "mailgun"];

/// Storage providers the backend knows how to drive.
pub const STORAGE_PROVIDERS: &[&str] = &["s3", "gcs", "azure"];

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailConfig {
    #[serde(deserialize_with = "wire::id")]
    pub project_id: i64,
    pub provider: String,
    /// Provider credential. Write-only from the dashboard's point of view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub sender_addresses: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
}

impl EmailConfig {
    /// Copy without the provider credential, for responses.
    pub fn redacted(&self) -> EmailConfig {
        EmailConfig {
            api_key: None,
            ..self.clone()
        }
    }
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("project_id", &self.project_id)
            .field("provider", &self.provider)
            .field("sender_addresses", &self.sender_addresses)
            .field("domains", &self.domains)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRegistration {
    pub project_id: i64,
    pub domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderRegistration {
    pub project_id: i64,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(deserialize_with = "wire::id")]
    pub project_id: i64,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub name: String,
    #[serde(deserialize_with = "wire::id")]
    pub project_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
