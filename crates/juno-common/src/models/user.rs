use crate::models::auth::Role;
use crate::models::wire;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Platform user as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "wire::id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(default, deserialize_with = "wire::id_set")]
    pub project_ids: BTreeSet<i64>,
}

/// Payload for creating a user.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(default)]
    pub project_ids: Vec<i64>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("project_ids", &self.project_ids)
            .finish_non_exhaustive()
    }
}

/// Partial update of a user; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.role.is_none()
    }
}
