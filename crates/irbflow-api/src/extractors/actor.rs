//! `Actor` extractor — resolves the trusted `X-Actor-Id` header into an
//! actor context.
//!
//! Identity is vouched for by the upstream gateway; this extractor only
//! resolves the id against the user store and loads the role set.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use irbflow_core::AppError;
use irbflow_core::types::UserId;
use irbflow_service::context::ActorContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the upstream-authenticated user id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extracted acting-user context available in handlers.
#[derive(Debug, Clone)]
pub struct Actor(pub ActorContext);

impl Actor {
    /// Returns the inner `ActorContext`.
    pub fn context(&self) -> &ActorContext {
        &self.0
    }
}

impl std::ops::Deref for Actor {
    type Target = ActorContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::permission_denied("Missing X-Actor-Id header"))?;

        let user_id = Uuid::parse_str(header)
            .map(UserId::from)
            .map_err(|_| AppError::validation(format!("Invalid X-Actor-Id: '{header}'")))?;

        let user = state
            .user_store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::permission_denied(format!("Unknown actor {user_id}")))?;

        Ok(Actor(ActorContext::from_user(&user)))
    }
}
