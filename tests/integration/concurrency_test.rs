//! Race tests for the completion detector and the optimistic version
//! token. These drive the service layer directly so two calls can be
//! in flight against the same proposal at once.

use serde_json::json;

use irbflow_core::error::ErrorKind;
use irbflow_core::types::ProposalId;
use irbflow_entity::proposal::{ProposalStatus, Vote};
use irbflow_service::proposal::SubmitReviewRequest;
use irbflow_store::traits::ProposalStore;

use crate::helpers::{TestApp, seed_workflow};

async fn drive_to_in_review(app: &TestApp, w: &crate::helpers::SeededWorkflow) -> ProposalId {
    let id = &w.proposal_id;
    app.post_ok(
        &format!("/api/proposals/{id}/advisor-approve"),
        None,
        w.advisor.id,
    )
    .await;
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
    }
    id.parse().expect("proposal id")
}

fn review(vote: Vote) -> SubmitReviewRequest {
    SubmitReviewRequest {
        vote,
        comment: "concurrent".to_string(),
        file_link: None,
    }
}

#[tokio::test]
async fn test_concurrent_final_votes_complete_exactly_once() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = drive_to_in_review(&app, &w).await;

    let ctx_a = app.actor(&w.reviewer_a);
    let ctx_b = app.actor(&w.reviewer_b);

    let (ra, rb) = tokio::join!(
        app.proposal_service
            .submit_review(&ctx_a, id, review(Vote::Approve)),
        app.proposal_service
            .submit_review(&ctx_b, id, review(Vote::Fix)),
    );
    ra.expect("reviewer A vote failed");
    rb.expect("reviewer B vote failed");

    let store: &dyn ProposalStore = app.store.as_ref();
    let proposal = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(proposal.status, ProposalStatus::PendingDecision);
    assert_eq!(proposal.reviews.len(), 2);
}

#[tokio::test]
async fn test_vote_after_completion_fails_precondition() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = drive_to_in_review(&app, &w).await;

    let ctx_a = app.actor(&w.reviewer_a);
    let ctx_b = app.actor(&w.reviewer_b);

    app.proposal_service
        .submit_review(&ctx_a, id, review(Vote::Approve))
        .await
        .unwrap();
    app.proposal_service
        .submit_review(&ctx_b, id, review(Vote::Approve))
        .await
        .unwrap();

    // The cycle is closed; resubmission is no longer in review.
    let err = app
        .proposal_service
        .submit_review(&ctx_a, id, review(Vote::Reject))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PreconditionFailed);
}

#[tokio::test]
async fn test_resubmission_before_completion_overwrites_in_place() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = drive_to_in_review(&app, &w).await;

    let ctx_a = app.actor(&w.reviewer_a);
    app.proposal_service
        .submit_review(&ctx_a, id, review(Vote::Fix))
        .await
        .unwrap();
    let proposal = app
        .proposal_service
        .submit_review(&ctx_a, id, review(Vote::Approve))
        .await
        .unwrap();

    assert_eq!(proposal.reviews.len(), 1);
    assert_eq!(proposal.reviews[0].vote, Vote::Approve);
    // One of two reviewers submitted; the cycle stays open.
    assert_eq!(proposal.status, ProposalStatus::InReview);
}

#[tokio::test]
async fn test_stale_version_token_conflicts() {
    let app = TestApp::new();
    let w = seed_workflow(&app).await;
    let id = drive_to_in_review(&app, &w).await;

    let store: &dyn ProposalStore = app.store.as_ref();
    let current = store.find_by_id(id).await.unwrap().unwrap();

    // A racing writer commits first.
    store
        .update(id, Some(current.version), Box::new(|_| Ok(())))
        .await
        .unwrap();

    // The stale token is now behind by one.
    let err = store
        .update(id, Some(current.version), Box::new(|_| Ok(())))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(err.is_retryable());
}
