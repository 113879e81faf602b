//! User registration and administration.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use irbflow_core::AppError;
use irbflow_core::result::AppResult;
use irbflow_core::types::UserId;
use irbflow_core::types::pagination::{PageRequest, PageResponse};
use irbflow_entity::permission::Permission;
use irbflow_entity::user::{Affiliation, CreateUser, User, UserKind, UserRole};
use irbflow_store::traits::UserStore;

use crate::context::ActorContext;

/// Partial update of a user record. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// Replacement role set.
    pub roles: Option<BTreeSet<UserRole>>,
    /// New classification.
    pub kind: Option<UserKind>,
    /// New affiliation.
    pub affiliation: Option<Affiliation>,
}

/// Admin-gated user management plus self-lookup.
#[derive(Clone)]
pub struct UserService {
    /// User store.
    users: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Registers a new user.
    pub async fn register(&self, ctx: &ActorContext, req: CreateUser) -> AppResult<User> {
        ctx.require_permission(Permission::ManageUsers)?;
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Field 'name' is required"));
        }
        if !req.email.contains('@') {
            return Err(AppError::validation(format!(
                "Invalid email address: '{}'",
                req.email
            )));
        }
        if req.roles.is_empty() {
            return Err(AppError::validation("At least one role is required"));
        }

        let user = self.users.insert(req.into_user()).await?;
        info!(user_id = %user.id, email = %user.email, "User registered");
        Ok(user)
    }

    /// Gets a user. Admins may fetch anyone; everyone may fetch themself.
    pub async fn get(&self, ctx: &ActorContext, id: UserId) -> AppResult<User> {
        if id != ctx.user_id {
            ctx.require_permission(Permission::ManageUsers)?;
        }
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Applies a partial update to a user record.
    pub async fn update(
        &self,
        ctx: &ActorContext,
        id: UserId,
        req: UpdateUserRequest,
    ) -> AppResult<User> {
        ctx.require_permission(Permission::ManageUsers)?;
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

        if let Some(name) = req.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Field 'name' must not be empty"));
            }
            user.name = name;
        }
        if let Some(email) = req.email {
            if !email.contains('@') {
                return Err(AppError::validation(format!(
                    "Invalid email address: '{email}'"
                )));
            }
            user.email = email;
        }
        if let Some(roles) = req.roles {
            if roles.is_empty() {
                return Err(AppError::validation("Role set must not be empty"));
            }
            user.roles = roles;
        }
        if let Some(kind) = req.kind {
            user.kind = Some(kind);
        }
        if let Some(affiliation) = req.affiliation {
            user.affiliation = affiliation;
        }
        user.updated_at = Utc::now();

        let user = self.users.update(user).await?;
        info!(user_id = %id, admin_id = %ctx.user_id, "User updated");
        Ok(user)
    }

    /// Lists all users.
    pub async fn list(
        &self,
        ctx: &ActorContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        ctx.require_permission(Permission::ManageUsers)?;
        self.users.find_all(page).await
    }
}
