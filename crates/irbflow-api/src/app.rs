//! Application builder — wires stores, services, router, and state into
//! a running Axum server.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use irbflow_core::AppError;
use irbflow_core::config::AppConfig;
use irbflow_core::config::server::CorsConfig;
use irbflow_entity::user::{Affiliation, CreateUser, UserRole};
use irbflow_service::notification::{NotificationDispatcher, NotificationService};
use irbflow_service::proposal::ProposalService;
use irbflow_service::user::UserService;
use irbflow_store::memory::MemoryStore;
use irbflow_store::traits::{NotificationStore, ProposalStore, UserStore};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state).layer(build_cors_layer(cors_config))
}

fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Runs the IRBFlow server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting IRBFlow server...");

    let store = Arc::new(MemoryStore::new());
    let proposal_store: Arc<dyn ProposalStore> = store.clone();
    let user_store: Arc<dyn UserStore> = store.clone();
    let notification_store: Arc<dyn NotificationStore> = store.clone();

    seed_bootstrap_admin(&user_store).await?;

    let dispatcher =
        NotificationDispatcher::new(Arc::clone(&user_store), Arc::clone(&notification_store));
    let proposal_service = Arc::new(ProposalService::new(
        Arc::clone(&proposal_store),
        Arc::clone(&user_store),
        dispatcher,
        config.workflow.clone(),
    ));
    let user_service = Arc::new(UserService::new(Arc::clone(&user_store)));
    let notification_service = Arc::new(NotificationService::new(Arc::clone(&notification_store)));

    let state = AppState {
        config: Arc::new(config.clone()),
        user_store,
        proposal_service,
        user_service,
        notification_service,
    };

    let app = build_app(state, &config.server.cors);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("IRBFlow server listening on {}", addr);

    let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(AppError::internal(format!("Server error: {e}"))),
                Err(e) => Err(AppError::internal(format!("Server task failed: {e}"))),
            };
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, draining connections");
            let _ = shutdown_tx.send(());
        }
    }

    if tokio::time::timeout(grace, &mut server).await.is_err() {
        tracing::warn!(
            "Connections did not drain within {}s, exiting",
            grace.as_secs()
        );
        server.abort();
    }

    Ok(())
}

/// Ensure at least one admin exists so the API is not locked out on a
/// fresh store.
async fn seed_bootstrap_admin(users: &Arc<dyn UserStore>) -> Result<(), AppError> {
    if !users.find_by_role(UserRole::Admin).await?.is_empty() {
        return Ok(());
    }
    let admin = CreateUser {
        name: "Bootstrap Admin".to_string(),
        email: "admin@irbflow.local".to_string(),
        roles: [UserRole::Admin].into_iter().collect(),
        kind: None,
        affiliation: Affiliation::default(),
    }
    .into_user();
    let admin = users.insert(admin).await?;
    tracing::info!(admin_id = %admin.id, "Seeded bootstrap admin");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    }
}
