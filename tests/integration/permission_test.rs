//! Capability, ownership, and visibility tests.

use axum::http::StatusCode;
use serde_json::json;

use irbflow_entity::user::UserRole;

use crate::helpers::{TestApp, seed_workflow};

#[tokio::test]
async fn test_missing_capability_is_forbidden() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = &w.proposal_id;

    // A researcher cannot assign reviewers.
    let response = app
        .request(
            "POST",
            &format!("/api/proposals/{id}/reviewers"),
            Some(json!({ "reviewer_ids": [w.reviewer_a.id] })),
            Some(w.researcher.id),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "PERMISSION_DENIED");

    // A reviewer cannot finalize decisions.
    let response = app
        .request(
            "POST",
            &format!("/api/proposals/{id}/decision"),
            Some(json!({ "decision": "approve" })),
            Some(w.reviewer_a.id),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_wrong_owner_is_unprocessable_not_forbidden() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = &w.proposal_id;

    // Another advisor has the capability but not this proposal.
    let other_advisor = app.create_user("Other Advisor", &[UserRole::Advisor]).await;
    let response = app
        .request(
            "POST",
            &format!("/api/proposals/{id}/advisor-approve"),
            None,
            Some(other_advisor.id),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "PRECONDITION_FAILED");

    // Another researcher cannot withdraw someone else's proposal.
    let other_researcher = app
        .create_user("Other Researcher", &[UserRole::Researcher])
        .await;
    let response = app
        .request(
            "POST",
            &format!("/api/proposals/{id}/withdraw"),
            Some(json!({ "reason": "not mine" })),
            Some(other_researcher.id),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_wrong_status_is_unprocessable() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = &w.proposal_id;

    // Proposal is pending_advisor; reviewer assignment needs the admin check.
    let response = app
        .request(
            "POST",
            &format!("/api/proposals/{id}/reviewers"),
            Some(json!({ "reviewer_ids": [w.reviewer_a.id] })),
            Some(w.admin.id),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_actor_is_rejected() {
    let app = TestApp::new();
    seed_workflow(&app).await;

    let response = app.request("GET", "/api/proposals", None, None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let ghost = irbflow_core::types::UserId::new();
    let response = app.request("GET", "/api/proposals", None, Some(ghost)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reviewer_identities_concealed_from_non_admins() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = &w.proposal_id;

    app.post_ok(
        &format!("/api/proposals/{id}/advisor-approve"),
        None,
        w.advisor.id,
    )
    .await;
    app.post_ok(
        &format!("/api/proposals/{id}/reviewers"),
        Some(json!({ "reviewer_ids": [w.reviewer_a.id] })),
        w.admin.id,
    )
    .await;
    app.post_ok(
        &format!("/api/proposals/{id}/assignment-response"),
        Some(json!({ "accept": true })),
        w.reviewer_a.id,
    )
    .await;
    app.post_ok(
        &format!("/api/proposals/{id}/reviews"),
        Some(json!({ "vote": "fix", "comment": "Needs work" })),
        w.reviewer_a.id,
    )
    .await;

    // The researcher sees the review content but not who wrote it.
    let data = app
        .get_ok(&format!("/api/proposals/{id}"), w.researcher.id)
        .await;
    assert!(data["reviewers"].is_null());
    assert_eq!(data["reviews"][0]["comment"], "Needs work");
    assert!(data["reviews"][0].get("reviewer_id").is_none());
    assert!(data["reviews"][0].get("reviewer_name").is_none());

    // The admin sees the full roster.
    let data = app.get_ok(&format!("/api/proposals/{id}"), w.admin.id).await;
    assert_eq!(data["reviewers"].as_array().unwrap().len(), 1);
    assert_eq!(
        data["reviews"][0]["reviewer_name"],
        w.reviewer_a.name.as_str()
    );
}

#[tokio::test]
async fn test_uninvolved_user_cannot_view_proposal() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = &w.proposal_id;

    let stranger = app.create_user("Stranger", &[UserRole::Researcher]).await;
    let response = app
        .request(
            "GET",
            &format!("/api/proposals/{id}"),
            None,
            Some(stranger.id),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_scoped_listing() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;

    // Create a second, unrelated proposal.
    let other = app.create_user("Other Researcher", &[UserRole::Researcher]).await;
    app.post_ok(
        "/api/proposals",
        Some(json!({ "title": "Unrelated", "document_link": null, "advisor_id": null })),
        other.id,
    )
    .await;

    let data = app
        .get_ok("/api/proposals?role=researcher", w.researcher.id)
        .await;
    assert_eq!(data["total_items"], 1);

    let data = app.get_ok("/api/proposals?role=advisor", w.advisor.id).await;
    assert_eq!(data["total_items"], 1);

    let data = app.get_ok("/api/proposals?role=admin", w.admin.id).await;
    assert_eq!(data["total_items"], 2);

    // Nothing assigned yet, so the reviewer sees an empty list.
    let data = app
        .get_ok("/api/proposals?role=reviewer", w.reviewer_a.id)
        .await;
    assert_eq!(data["total_items"], 0);

    // Listing under a role the actor does not hold is forbidden.
    let response = app
        .request(
            "GET",
            "/api/proposals?role=admin",
            None,
            Some(w.researcher.id),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_only_admins_manage_users() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;

    let body = json!({
        "name": "New Reviewer",
        "email": "new.reviewer@test.edu",
        "roles": ["reviewer"],
        "kind": "staff",
        "affiliation": { "campus": "Main", "faculty": "Faculty of Science" },
    });

    let response = app
        .request("POST", "/api/users", Some(body.clone()), Some(w.researcher.id))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let data = app.post_ok("/api/users", Some(body), w.admin.id).await;
    assert_eq!(data["roles"][0], "reviewer");
}
