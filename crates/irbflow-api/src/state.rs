//! Application state shared across all handlers.

use std::sync::Arc;

use irbflow_core::config::AppConfig;
use irbflow_service::notification::NotificationService;
use irbflow_service::proposal::ProposalService;
use irbflow_service::user::UserService;
use irbflow_store::traits::UserStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// User store, used by the actor extractor to resolve identities.
    pub user_store: Arc<dyn UserStore>,
    /// Proposal workflow engine.
    pub proposal_service: Arc<ProposalService>,
    /// User management service.
    pub user_service: Arc<UserService>,
    /// Notification read API.
    pub notification_service: Arc<NotificationService>,
}
