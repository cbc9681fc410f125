use crate::models::wire;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Account type of a platform user.
///
/// The discriminant is the index of the role's row in [`ROLE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Role {
    SuperAdmin = 0,
    Admin = 1,
    User = 2,
}

/// The one mapping between roles, backend codes, string keys and labels.
const ROLE_TABLE: [(Role, u8, &str, &str); 3] = [
    (Role::SuperAdmin, 0, "SUPERADMIN", "Super Admin"),
    (Role::Admin, 1, "ADMIN", "Admin"),
    (Role::User, 2, "USER", "User"),
];

impl Role {
    pub const ALL: [Role; 3] = [Role::SuperAdmin, Role::Admin, Role::User];

    /// Integer code used by the backend.
    pub fn code(self) -> u8 {
        ROLE_TABLE[self as usize].1
    }

    /// Canonical string key (`"SUPERADMIN"`, `"ADMIN"`, `"USER"`).
    pub fn key(self) -> &'static str {
        ROLE_TABLE[self as usize].2
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        ROLE_TABLE[self as usize].3
    }

    pub fn from_code(code: u64) -> Option<Role> {
        ROLE_TABLE
            .iter()
            .find(|(_, c, _, _)| u64::from(*c) == code)
            .map(|(role, ..)| *role)
    }

    /// Case-insensitive lookup by string key.
    pub fn from_key(key: &str) -> Option<Role> {
        ROLE_TABLE
            .iter()
            .find(|(_, _, k, _)| k.eq_ignore_ascii_case(key.trim()))
            .map(|(role, ..)| *role)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(role) = Role::from_key(s) {
            return Ok(role);
        }
        match s.trim().parse::<u64>().ok().and_then(Role::from_code) {
            Some(role) => Ok(role),
            None => anyhow::bail!("Unknown user type '{}'", s),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

struct RoleVisitor;

impl<'de> Visitor<'de> for RoleVisitor {
    type Value = Role;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a user type code (0-2) or key (SUPERADMIN, ADMIN, USER)")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Role, E> {
        Role::from_code(v).ok_or_else(|| E::custom(format!("unknown user type code {}", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Role, E> {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(E::custom(format!("unknown user type code {}", v))),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Role, E> {
        v.parse::<Role>().map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RoleVisitor)
    }
}

/// Identity confirmed by the backend for the current request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedUser {
    #[serde(deserialize_with = "wire::id")]
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(default, deserialize_with = "wire::id_set")]
    pub project_ids: BTreeSet<i64>,
}

/// Body of `GET /auth/test-auth`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenCheck {
    #[serde(default)]
    pub valid: bool,
    pub user: Option<VerifiedUser>,
}

/// A verified token together with the identity it asserts.
#[derive(Clone)]
pub struct Session {
    pub jwt: String,
    pub user: VerifiedUser,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("jwt", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}
