//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use irbflow_core::types::NotificationId;
use irbflow_core::types::pagination::PageResponse;

use crate::dto::response::{ApiResponse, CountResponse, MessageResponse, NotificationResponse};
use crate::error::ApiError;
use crate::extractors::{Actor, PaginationParams};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    actor: Actor,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<NotificationResponse>>>, ApiError> {
    let page = state
        .notification_service
        .list(&actor, &params.into_page_request())
        .await?;
    let result = PageResponse {
        items: page
            .items
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
        page: page.page,
        page_size: page.page_size,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next: page.has_next,
        has_previous: page.has_previous,
    };
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_service.unread_count(&actor).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<NotificationId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notification_service.mark_read(&actor, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Marked as read".to_string(),
    })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_service.mark_all_read(&actor).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}
