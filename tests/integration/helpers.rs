//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use irbflow_core::config::AppConfig;
use irbflow_core::types::UserId;
use irbflow_entity::user::{Affiliation, User, UserKind, UserRole};
use irbflow_service::context::ActorContext;
use irbflow_service::notification::{NotificationDispatcher, NotificationService};
use irbflow_service::proposal::ProposalService;
use irbflow_service::user::UserService;
use irbflow_store::memory::MemoryStore;
use irbflow_store::traits::{NotificationStore, ProposalStore, UserStore};

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// The shared in-memory store, for direct assertions.
    pub store: Arc<MemoryStore>,
    /// The workflow engine, for service-level (non-HTTP) tests.
    pub proposal_service: Arc<ProposalService>,
    /// The notification read API.
    pub notification_service: Arc<NotificationService>,
}

impl TestApp {
    /// Create a new test application over a fresh in-memory store.
    pub fn new() -> Self {
        let config = AppConfig::default();
        let store = Arc::new(MemoryStore::new());
        let proposal_store: Arc<dyn ProposalStore> = store.clone();
        let user_store: Arc<dyn UserStore> = store.clone();
        let notification_store: Arc<dyn NotificationStore> = store.clone();

        let dispatcher =
            NotificationDispatcher::new(Arc::clone(&user_store), Arc::clone(&notification_store));
        let proposal_service = Arc::new(ProposalService::new(
            Arc::clone(&proposal_store),
            Arc::clone(&user_store),
            dispatcher,
            config.workflow.clone(),
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&user_store)));
        let notification_service =
            Arc::new(NotificationService::new(Arc::clone(&notification_store)));

        let state = irbflow_api::state::AppState {
            config: Arc::new(config),
            user_store,
            proposal_service: Arc::clone(&proposal_service),
            user_service,
            notification_service: Arc::clone(&notification_service),
        };

        let router = irbflow_api::router::build_router(state);

        Self {
            router,
            store,
            proposal_service,
            notification_service,
        }
    }

    /// Create a user with the given roles and return the record.
    pub async fn create_user(&self, name: &str, roles: &[UserRole]) -> User {
        let now = chrono::Utc::now();
        let user = User {
            id: UserId::new(),
            name: name.to_string(),
            email: format!("{}@test.edu", name.to_lowercase().replace(' ', ".")),
            roles: roles.iter().copied().collect(),
            kind: Some(UserKind::Staff),
            affiliation: Affiliation {
                campus: "Main".to_string(),
                faculty: "Faculty of Science".to_string(),
            },
            created_at: now,
            updated_at: now,
        };
        let users: &dyn UserStore = self.store.as_ref();
        users.insert(user).await.expect("Failed to create test user")
    }

    /// Build an actor context for a user, for service-level calls.
    pub fn actor(&self, user: &User) -> ActorContext {
        ActorContext::from_user(user)
    }

    /// Make an HTTP request to the test app as the given actor.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        actor: Option<UserId>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(actor) = actor {
            req = req.header("X-Actor-Id", actor.to_string());
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// POST helper that asserts 200 OK and returns the `data` payload.
    pub async fn post_ok(&self, path: &str, body: Option<Value>, actor: UserId) -> Value {
        let response = self.request("POST", path, body, Some(actor)).await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "POST {path} failed: {:?}",
            response.body
        );
        response.body["data"].clone()
    }

    /// GET helper that asserts 200 OK and returns the `data` payload.
    pub async fn get_ok(&self, path: &str, actor: UserId) -> Value {
        let response = self.request("GET", path, None, Some(actor)).await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "GET {path} failed: {:?}",
            response.body
        );
        response.body["data"].clone()
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed JSON body.
    pub body: Value,
}

/// A researcher, advisor, two reviewers, and an admin, plus a proposal
/// already created by the researcher (status: pending_advisor).
pub struct SeededWorkflow {
    pub researcher: User,
    pub advisor: User,
    pub reviewer_a: User,
    pub reviewer_b: User,
    pub admin: User,
    pub proposal_id: String,
}

/// Seed the common five-actor setup and submit one proposal.
pub async fn seed_workflow(app: &TestApp) -> SeededWorkflow {
    let researcher = app
        .create_user("Priya Narayan", &[UserRole::Researcher])
        .await;
    let advisor = app.create_user("Tomas Keller", &[UserRole::Advisor]).await;
    let reviewer_a = app
        .create_user("Ingrid Solheim", &[UserRole::Reviewer])
        .await;
    let reviewer_b = app.create_user("Mateo Ruiz", &[UserRole::Reviewer]).await;
    let admin = app.create_user("Office Admin", &[UserRole::Admin]).await;

    let data = app
        .post_ok(
            "/api/proposals",
            Some(serde_json::json!({
                "title": "Sleep patterns in shift workers",
                "document_link": "https://docs.test.edu/p1.pdf",
                "advisor_id": advisor.id,
            })),
            researcher.id,
        )
        .await;

    let proposal_id = data["id"].as_str().expect("proposal id").to_string();

    SeededWorkflow {
        researcher,
        advisor,
        reviewer_a,
        reviewer_b,
        admin,
        proposal_id,
    }
}
