//! Role and project-scope predicates.
//!
//! All predicates are pure and total: a missing user is never authorized.

use juno_common::models::auth::{Role, VerifiedUser};
use juno_common::models::user::User;

/// True iff a user is present and its role is one of `allowed`.
pub fn require_role(user: Option<&VerifiedUser>, allowed: &[Role]) -> bool {
    user.is_some_and(|u| allowed.contains(&u.role))
}

pub fn require_admin(user: Option<&VerifiedUser>) -> bool {
    require_role(user, &[Role::SuperAdmin, Role::Admin])
}

pub fn require_super_admin(user: Option<&VerifiedUser>) -> bool {
    require_role(user, &[Role::SuperAdmin])
}

/// Superadmins reach every project; everyone else only their own.
pub fn has_project_access(user: Option<&VerifiedUser>, project_id: i64) -> bool {
    match user {
        Some(u) if u.role == Role::SuperAdmin => true,
        Some(u) => u.project_ids.contains(&project_id),
        None => false,
    }
}

/// Whether `actor` may create or promote an account to `target`.
/// Superadmins may assign any role, admins only `USER`.
pub fn can_assign_role(actor: Option<&VerifiedUser>, target: Role) -> bool {
    match actor.map(|u| u.role) {
        Some(Role::SuperAdmin) => true,
        Some(Role::Admin) => target == Role::User,
        _ => false,
    }
}

/// Whether `actor` may edit, unlink or delete the account `target`.
/// Admins only manage plain users sharing at least one of their projects.
pub fn can_manage_user(actor: Option<&VerifiedUser>, target: &User) -> bool {
    match actor {
        Some(u) if u.role == Role::SuperAdmin => true,
        Some(u) if u.role == Role::Admin => {
            target.role == Role::User && !u.project_ids.is_disjoint(&target.project_ids)
        }
        _ => false,
    }
}
