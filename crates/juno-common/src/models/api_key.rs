use crate::models::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deployment environment an API key is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEnvironment {
    Prod,
    Dev,
}

/// API key metadata. The raw key is only ever returned once, at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    #[serde(deserialize_with = "wire::id")]
    pub id: i64,
    #[serde(deserialize_with = "wire::id")]
    pub project_id: i64,
    pub description: String,
    pub environment: KeyEnvironment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApiKey {
    pub project_id: i64,
    pub description: String,
    pub environment: KeyEnvironment,
}

/// Response to key creation.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedApiKey {
    pub api_key: String,
    pub info: ApiKey,
}

impl std::fmt::Debug for CreatedApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedApiKey")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_key_parse() {
        let key: ApiKey = serde_json::from_value(json!({
            "id": 3,
            "projectId": "12",
            "description": "ci",
            "environment": "prod",
            "createdAt": "2025-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(key.project_id, 12);
        assert_eq!(key.environment, KeyEnvironment::Prod);
        assert!(key.prefix.is_none());
        assert!(key.created_at.is_some());
    }

    #[test]
    fn test_unknown_environment_rejected() {
        let result = serde_json::from_value::<KeyEnvironment>(json!("staging"));
        assert!(result.is_err());
    }
}
