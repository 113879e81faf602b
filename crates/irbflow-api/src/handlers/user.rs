//! User management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use irbflow_core::types::UserId;
use irbflow_core::types::pagination::PageResponse;
use irbflow_entity::user::CreateUser;
use irbflow_service::user::UpdateUserRequest;

use crate::dto::response::{ApiResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{Actor, PaginationParams};
use crate::state::AppState;

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    actor: Actor,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<UserResponse>>>, ApiError> {
    let page = state
        .user_service
        .list(&actor, &params.into_page_request())
        .await?;
    let result = PageResponse {
        items: page.items.into_iter().map(UserResponse::from).collect(),
        page: page.page,
        page_size: page.page_size,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next: page.has_next,
        has_previous: page.has_previous,
    };
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.get(&actor, actor.user_id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// GET /api/users/{id}
pub async fn get(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<UserId>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.get(&actor, id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// POST /api/users
pub async fn register(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateUser>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.register(&actor, req).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<UserId>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.update(&actor, id, req).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}
