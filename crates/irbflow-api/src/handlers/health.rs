//! Health check handler.

use axum::Json;

use crate::dto::response::{ApiResponse, MessageResponse};

/// GET /api/health
pub async fn health() -> Json<ApiResponse<MessageResponse>> {
    Json(ApiResponse::ok(MessageResponse {
        message: "ok".to_string(),
    }))
}
