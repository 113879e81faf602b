//! Route definitions for the IRBFlow HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(proposal_routes())
        .merge(user_routes())
        .merge(notification_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Proposal CRUD and workflow transitions.
fn proposal_routes() -> Router<AppState> {
    Router::new()
        .route("/proposals", get(handlers::proposal::list))
        .route("/proposals", post(handlers::proposal::create))
        .route("/proposals/{id}", get(handlers::proposal::get))
        .route(
            "/proposals/{id}/advisor-approve",
            post(handlers::proposal::advisor_approve),
        )
        .route(
            "/proposals/{id}/advisor-return",
            post(handlers::proposal::advisor_return),
        )
        .route(
            "/proposals/{id}/admin-return",
            post(handlers::proposal::admin_return),
        )
        .route(
            "/proposals/{id}/reviewers",
            post(handlers::proposal::assign_reviewers),
        )
        .route(
            "/proposals/{id}/assignment-response",
            post(handlers::proposal::respond_to_assignment),
        )
        .route(
            "/proposals/{id}/reviews",
            post(handlers::proposal::submit_review),
        )
        .route(
            "/proposals/{id}/decision",
            post(handlers::proposal::finalize_decision),
        )
        .route(
            "/proposals/{id}/certificate",
            post(handlers::proposal::issue_certificate),
        )
        .route(
            "/proposals/{id}/revisions",
            post(handlers::proposal::submit_revision),
        )
        .route(
            "/proposals/{id}/withdraw",
            post(handlers::proposal::withdraw),
        )
        .route(
            "/proposals/{id}/renewal-request",
            post(handlers::proposal::request_renewal),
        )
        .route(
            "/proposals/{id}/renewal-approve",
            post(handlers::proposal::approve_renewal),
        )
        .route("/proposals/{id}/suspend", post(handlers::proposal::suspend))
        .route(
            "/proposals/{id}/force-reset",
            post(handlers::proposal::force_reset),
        )
        .route(
            "/proposals/{id}/progress-reports",
            post(handlers::proposal::submit_progress_report),
        )
        .route(
            "/proposals/{id}/progress-reports/{report_id}/acknowledge",
            post(handlers::proposal::acknowledge_progress_report),
        )
}

/// User management endpoints.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list))
        .route("/users", post(handlers::user::register))
        .route("/users/me", get(handlers::user::me))
        .route("/users/{id}", get(handlers::user::get))
        .route("/users/{id}", put(handlers::user::update))
}

/// Notification endpoints.
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}

/// Health check.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
