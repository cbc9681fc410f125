use crate::models::auth::Role;
use crate::models::user::NewUser;
use serde::{Deserialize, Serialize};

/// A pending signup awaiting review by an administrator.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub user_type: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

impl std::fmt::Debug for AccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRequest")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("user_type", &self.user_type)
            .field("project_name", &self.project_name)
            .finish_non_exhaustive()
    }
}

/// Signup form as submitted by a prospective user.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub user_type: Role,
    #[serde(default)]
    pub project_name: Option<String>,
}

impl AccountRequest {
    pub fn from_submission(id: i64, req: NewAccountRequest) -> Self {
        Self {
            id,
            name: req.name,
            email: req.email,
            password: req.password,
            user_type: req.user_type,
            project_name: req.project_name,
        }
    }

    /// User creation payload for an approved request.
    pub fn to_new_user(&self, project_ids: Vec<i64>) -> NewUser {
        NewUser {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            role: self.user_type,
            project_ids,
        }
    }
}
