//! Actor context carrying the caller's identity and role set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use irbflow_core::AppError;
use irbflow_core::result::AppResult;
use irbflow_core::types::UserId;
use irbflow_entity::permission::{self, Permission};
use irbflow_entity::user::{User, UserRole};

/// Context for the acting user of an engine call.
///
/// Built by the API layer from the identity the upstream provider
/// vouched for, and passed explicitly into every service method. There
/// is no ambient "current user" anywhere in the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// The acting user's display name.
    pub name: String,
    /// The roles the actor holds.
    pub roles: BTreeSet<UserRole>,
}

impl ActorContext {
    /// Creates a new actor context.
    pub fn new(user_id: UserId, name: impl Into<String>, roles: BTreeSet<UserRole>) -> Self {
        Self {
            user_id,
            name: name.into(),
            roles,
        }
    }

    /// Builds a context from a stored user record.
    pub fn from_user(user: &User) -> Self {
        Self::new(user.id, user.name.clone(), user.roles.clone())
    }

    /// Whether any of the actor's roles grants the permission.
    pub fn has_permission(&self, permission: Permission) -> bool {
        permission::has_permission(&self.roles, permission)
    }

    /// Require the permission, or fail with a permission-denied error.
    pub fn require_permission(&self, permission: Permission) -> AppResult<()> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::permission_denied(format!(
                "Actor {} lacks the '{permission}' capability",
                self.user_id
            )))
        }
    }

    /// Whether the actor holds the given role.
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the actor holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }
}
