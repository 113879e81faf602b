//! End-to-end workflow tests: submission through certification, revision
//! cycles, withdrawal, and renewal.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, seed_workflow};

#[tokio::test]
async fn test_full_lifecycle_with_revision_cycle() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = &w.proposal_id;

    // Advisor pre-screen.
    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/advisor-approve"),
            None,
            w.advisor.id,
        )
        .await;
    assert_eq!(data["status"], "pending_admin_check");
    assert!(
        data["code"].as_str().unwrap().starts_with("FOS-"),
        "unexpected code: {}",
        data["code"]
    );

    // Admin assigns a two-person committee.
    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/reviewers"),
            Some(json!({ "reviewer_ids": [w.reviewer_a.id, w.reviewer_b.id] })),
            w.admin.id,
        )
        .await;
    assert_eq!(data["status"], "in_review");

    // Both reviewers accept; the first vote leaves the cycle open.
    for reviewer in [&w.reviewer_a, &w.reviewer_b] {
        app.post_ok(
            &format!("/api/proposals/{id}/assignment-response"),
            Some(json!({ "accept": true })),
            reviewer.id,
        )
        .await;
    }
    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/reviews"),
            Some(json!({ "vote": "fix", "comment": "Consent form unclear" })),
            w.reviewer_a.id,
        )
        .await;
    assert_eq!(data["status"], "in_review");

    // Second vote completes the set and auto-advances.
    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/reviews"),
            Some(json!({ "vote": "approve", "comment": "Fine as is" })),
            w.reviewer_b.id,
        )
        .await;
    assert_eq!(data["status"], "pending_decision");

    // Admin requests fixes with consolidated feedback.
    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/decision"),
            Some(json!({ "decision": "fix", "feedback": "Clarify the consent form" })),
            w.admin.id,
        )
        .await;
    assert_eq!(data["status"], "revision_requested");

    // Researcher resubmits; the revision log snapshots the feedback.
    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/revisions"),
            Some(json!({ "file_link": "https://docs.test.edu/p1-v2.pdf" })),
            w.researcher.id,
        )
        .await;
    assert_eq!(data["status"], "pending_admin_check");
    assert_eq!(data["revision_count"], 1);
    assert_eq!(data["revision_history"].as_array().unwrap().len(), 1);
    assert_eq!(
        data["revision_history"][0]["feedback_snapshot"],
        "Clarify the consent form"
    );

    // Second cycle: reassign, both approve, admin approves.
    app.post_ok(
        &format!("/api/proposals/{id}/reviewers"),
        Some(json!({ "reviewer_ids": [w.reviewer_a.id, w.reviewer_b.id] })),
        w.admin.id,
    )
    .await;
    for reviewer in [&w.reviewer_a, &w.reviewer_b] {
        app.post_ok(
            &format!("/api/proposals/{id}/assignment-response"),
            Some(json!({ "accept": true })),
            reviewer.id,
        )
        .await;
        app.post_ok(
            &format!("/api/proposals/{id}/reviews"),
            Some(json!({ "vote": "approve", "comment": "Resolved" })),
            reviewer.id,
        )
        .await;
    }
    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/decision"),
            Some(json!({ "decision": "approve" })),
            w.admin.id,
        )
        .await;
    assert_eq!(data["status"], "waiting_certificate");

    // Certificate issuance opens the validity window.
    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/certificate"),
            Some(json!({ "certificate_link": "https://docs.test.edu/cert.pdf" })),
            w.admin.id,
        )
        .await;
    assert_eq!(data["status"], "approved");
    assert_eq!(data["approval"]["certificate_number"], "REC-000001");
    assert!(data["next_report_due"].is_string());
    assert_eq!(data["revision_count"], 1);
}

#[tokio::test]
async fn test_advisor_return_feeds_revision_snapshot() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = &w.proposal_id;

    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/advisor-return"),
            Some(json!({ "reason": "Missing methodology section" })),
            w.advisor.id,
        )
        .await;
    assert_eq!(data["status"], "admin_rejected");

    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/revisions"),
            Some(json!({ "file_link": "https://docs.test.edu/p1-v2.pdf" })),
            w.researcher.id,
        )
        .await;
    assert_eq!(data["status"], "pending_admin_check");
    assert_eq!(
        data["revision_history"][0]["feedback_snapshot"],
        "Missing methodology section"
    );
}

#[tokio::test]
async fn test_withdraw_is_terminal() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = &w.proposal_id;

    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/withdraw"),
            Some(json!({ "reason": "Funding fell through" })),
            w.researcher.id,
        )
        .await;
    assert_eq!(data["status"], "withdrawn");

    // No transition escapes a terminal status, not even the admin reset.
    let response = app
        .request(
            "POST",
            &format!("/api/proposals/{id}/force-reset"),
            None,
            Some(w.admin.id),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .request(
            "POST",
            &format!("/api/proposals/{id}/advisor-approve"),
            None,
            Some(w.advisor.id),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_rejection_leaves_proposal_untouched_apart_from_status() {
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
        Some(json!({ "vote": "reject", "comment": "Serious ethical concerns" })),
        w.reviewer_a.id,
    )
    .await;

    let before = app.get_ok(&format!("/api/proposals/{id}"), w.admin.id).await;
    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/decision"),
            Some(json!({ "decision": "reject" })),
            w.admin.id,
        )
        .await;
    assert_eq!(data["status"], "rejected");
    assert_eq!(data["title"], before["title"]);
    assert_eq!(data["revision_count"], before["revision_count"]);
    assert_eq!(data["reviews"], before["reviews"]);
    assert!(data["approval"].is_null());
}

#[tokio::test]
async fn test_renewal_moves_only_the_expiry_date() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = &w.proposal_id;

    // Drive to approved with a one-person committee.
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
        Some(json!({ "vote": "approve", "comment": "ok" })),
        w.reviewer_a.id,
    )
    .await;
    app.post_ok(
        &format!("/api/proposals/{id}/decision"),
        Some(json!({ "decision": "approve" })),
        w.admin.id,
    )
    .await;
    let approved = app
        .post_ok(&format!("/api/proposals/{id}/certificate"), Some(json!({})), w.admin.id)
        .await;
    let number = approved["approval"]["certificate_number"].clone();
    let issuance = approved["approval"]["issuance_date"].clone();
    let expiry = approved["approval"]["expiry_date"]
        .as_str()
        .unwrap()
        .to_string();

    app.post_ok(
        &format!("/api/proposals/{id}/renewal-request"),
        None,
        w.researcher.id,
    )
    .await;
    let renewed = app
        .post_ok(
            &format!("/api/proposals/{id}/renewal-approve"),
            None,
            w.admin.id,
        )
        .await;

    assert_eq!(renewed["status"], "approved");
    assert_eq!(renewed["approval"]["certificate_number"], number);
    assert_eq!(renewed["approval"]["issuance_date"], issuance);
    assert!(
        renewed["approval"]["expiry_date"].as_str().unwrap() > expiry.as_str(),
        "expiry did not move forward"
    );
}

#[tokio::test]
async fn test_progress_report_submit_and_acknowledge() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = &w.proposal_id;

    // Shortest path to approved.
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
        Some(json!({ "vote": "approve", "comment": "ok" })),
        w.reviewer_a.id,
    )
    .await;
    app.post_ok(
        &format!("/api/proposals/{id}/decision"),
        Some(json!({ "decision": "approve" })),
        w.admin.id,
    )
    .await;
    app.post_ok(&format!("/api/proposals/{id}/certificate"), Some(json!({})), w.admin.id)
        .await;

    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/progress-reports"),
            Some(json!({
                "kind": "six_month",
                "file_link": "https://docs.test.edu/report1.pdf",
            })),
            w.researcher.id,
        )
        .await;
    let report_id = data["progress_reports"][0]["id"].as_str().unwrap();
    assert!(data["progress_reports"][0]["acknowledged_at"].is_null());

    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/progress-reports/{report_id}/acknowledge"),
            None,
            w.admin.id,
        )
        .await;
    assert!(data["progress_reports"][0]["acknowledged_at"].is_string());

    // A second acknowledge is rejected.
    let response = app
        .request(
            "POST",
            &format!("/api/proposals/{id}/progress-reports/{report_id}/acknowledge"),
            None,
            Some(w.admin.id),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_suspend_and_reset_approved_proposal() {
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
        Some(json!({ "vote": "approve", "comment": "ok" })),
        w.reviewer_a.id,
    )
    .await;
    app.post_ok(
        &format!("/api/proposals/{id}/decision"),
        Some(json!({ "decision": "approve" })),
        w.admin.id,
    )
    .await;
    app.post_ok(&format!("/api/proposals/{id}/certificate"), Some(json!({})), w.admin.id)
        .await;

    let data = app
        .post_ok(
            &format!("/api/proposals/{id}/suspend"),
            Some(json!({ "reason": "Adverse event under investigation" })),
            w.admin.id,
        )
        .await;
    assert_eq!(data["status"], "suspended");

    // The escape hatch returns a suspended proposal to screening.
    let data = app
        .post_ok(&format!("/api/proposals/{id}/force-reset"), None, w.admin.id)
        .await;
    assert_eq!(data["status"], "pending_admin_check");
}

#[tokio::test]
async fn test_proposal_without_advisor_skips_prescreen() {
    let app = TestApp::new();
    let researcher = app
        .create_user("Solo Researcher", &[irbflow_entity::user::UserRole::Researcher])
        .await;
    app.create_user("Office Admin", &[irbflow_entity::user::UserRole::Admin])
        .await;

    let data = app
        .post_ok(
            "/api/proposals",
            Some(json!({ "title": "Archival study", "document_link": null, "advisor_id": null })),
            researcher.id,
        )
        .await;
    assert_eq!(data["status"], "pending_admin_check");
}
