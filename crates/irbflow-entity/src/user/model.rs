//! User entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use irbflow_core::types::UserId;

use super::role::UserRole;

/// Classification of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    /// A student researcher (requires an advisor pre-screen).
    Student,
    /// A member of staff.
    Staff,
    /// An external collaborator.
    External,
}

impl UserKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Staff => "staff",
            Self::External => "external",
        }
    }
}

impl std::fmt::Display for UserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Institutional affiliation of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    /// Campus name.
    pub campus: String,
    /// Faculty name, used to derive proposal codes.
    pub faculty: String,
}

/// A registered user in the IRBFlow system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Full display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// The set of roles the user holds. A user may hold several.
    pub roles: BTreeSet<UserRole>,
    /// User classification (optional).
    pub kind: Option<UserKind>,
    /// Institutional affiliation.
    pub affiliation: Affiliation,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the user holds the given role.
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the user holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }
}

/// Data required to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Full display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Roles to grant at registration.
    pub roles: BTreeSet<UserRole>,
    /// User classification (optional).
    pub kind: Option<UserKind>,
    /// Institutional affiliation.
    pub affiliation: Affiliation,
}

impl CreateUser {
    /// Materialize a `User` record with fresh identity and timestamps.
    pub fn into_user(self) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            name: self.name,
            email: self.email,
            roles: self.roles,
            kind: self.kind,
            affiliation: self.affiliation,
            created_at: now,
            updated_at: now,
        }
    }
}
