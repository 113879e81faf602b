//! Proposal workflow handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use irbflow_core::types::pagination::PageResponse;
use irbflow_core::types::{ProposalId, ReportId};
use irbflow_entity::proposal::{CreateProposal, Proposal};
use irbflow_entity::user::UserRole;
use irbflow_service::proposal::{
    FinalizeDecisionRequest, SubmitProgressReportRequest, SubmitReviewRequest,
    SubmitRevisionRequest,
};
use serde::Deserialize;

use crate::dto::request::{
    AssignReviewersRequest, AssignmentResponseRequest, IssueCertificateRequest, ReasonRequest,
};
use crate::dto::response::{ApiResponse, ProposalResponse};
use crate::error::ApiError;
use crate::extractors::{Actor, PaginationParams};
use crate::state::AppState;

type ProposalResult = Result<Json<ApiResponse<ProposalResponse>>, ApiError>;

fn respond(actor: &Actor, proposal: Proposal) -> ProposalResult {
    Ok(Json(ApiResponse::ok(ProposalResponse::project(
        proposal,
        actor.is_admin(),
    ))))
}

/// Query parameters for proposal listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// The role to list as; defaults to researcher.
    pub role: Option<UserRole>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub per_page: Option<u64>,
}

/// GET /api/proposals
pub async fn list(
    State(state): State<AppState>,
    actor: Actor,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<PageResponse<ProposalResponse>>>, ApiError> {
    let role = params.role.unwrap_or(UserRole::Researcher);
    let page = PaginationParams {
        page: params.page.unwrap_or(1),
        per_page: params.per_page.unwrap_or(25),
    }
    .into_page_request();
    let result = state.proposal_service.list(&actor, role, &page).await?;
    Ok(Json(ApiResponse::ok(ProposalResponse::project_page(
        result,
        actor.is_admin(),
    ))))
}

/// GET /api/proposals/{id}
pub async fn get(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
) -> ProposalResult {
    let proposal = state.proposal_service.get(&actor, id).await?;
    respond(&actor, proposal)
}

/// POST /api/proposals
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateProposal>,
) -> ProposalResult {
    let proposal = state.proposal_service.create(&actor, req).await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/advisor-approve
pub async fn advisor_approve(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
) -> ProposalResult {
    let proposal = state.proposal_service.advisor_approve(&actor, id).await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/advisor-return
pub async fn advisor_return(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
    Json(req): Json<ReasonRequest>,
) -> ProposalResult {
    let proposal = state
        .proposal_service
        .advisor_return(&actor, id, req.reason)
        .await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/admin-return
pub async fn admin_return(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
    Json(req): Json<ReasonRequest>,
) -> ProposalResult {
    let proposal = state
        .proposal_service
        .admin_return(&actor, id, req.reason)
        .await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/reviewers
pub async fn assign_reviewers(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
    Json(req): Json<AssignReviewersRequest>,
) -> ProposalResult {
    let proposal = state
        .proposal_service
        .assign_reviewers(&actor, id, req.reviewer_ids)
        .await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/assignment-response
pub async fn respond_to_assignment(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
    Json(req): Json<AssignmentResponseRequest>,
) -> ProposalResult {
    let proposal = state
        .proposal_service
        .respond_to_assignment(&actor, id, req.accept)
        .await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/reviews
pub async fn submit_review(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
    Json(req): Json<SubmitReviewRequest>,
) -> ProposalResult {
    let proposal = state.proposal_service.submit_review(&actor, id, req).await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/decision
pub async fn finalize_decision(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
    Json(req): Json<FinalizeDecisionRequest>,
) -> ProposalResult {
    let proposal = state
        .proposal_service
        .finalize_decision(&actor, id, req)
        .await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/certificate
pub async fn issue_certificate(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
    Json(req): Json<IssueCertificateRequest>,
) -> ProposalResult {
    let proposal = state
        .proposal_service
        .issue_certificate(&actor, id, req.certificate_link)
        .await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/revisions
pub async fn submit_revision(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
    Json(req): Json<SubmitRevisionRequest>,
) -> ProposalResult {
    let proposal = state
        .proposal_service
        .submit_revision(&actor, id, req)
        .await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
    Json(req): Json<ReasonRequest>,
) -> ProposalResult {
    let proposal = state
        .proposal_service
        .withdraw(&actor, id, req.reason)
        .await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/renewal-request
pub async fn request_renewal(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
) -> ProposalResult {
    let proposal = state.proposal_service.request_renewal(&actor, id).await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/renewal-approve
pub async fn approve_renewal(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
) -> ProposalResult {
    let proposal = state.proposal_service.approve_renewal(&actor, id).await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/suspend
pub async fn suspend(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
    Json(req): Json<ReasonRequest>,
) -> ProposalResult {
    let proposal = state
        .proposal_service
        .suspend(&actor, id, req.reason)
        .await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/force-reset
pub async fn force_reset(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
) -> ProposalResult {
    let proposal = state.proposal_service.force_reset(&actor, id).await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/progress-reports
pub async fn submit_progress_report(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<ProposalId>,
    Json(req): Json<SubmitProgressReportRequest>,
) -> ProposalResult {
    let proposal = state
        .proposal_service
        .submit_progress_report(&actor, id, req)
        .await?;
    respond(&actor, proposal)
}

/// POST /api/proposals/{id}/progress-reports/{report_id}/acknowledge
pub async fn acknowledge_progress_report(
    State(state): State<AppState>,
    actor: Actor,
    Path((id, report_id)): Path<(ProposalId, ReportId)>,
) -> ProposalResult {
    let proposal = state
        .proposal_service
        .acknowledge_progress_report(&actor, id, report_id)
        .await?;
    respond(&actor, proposal)
}
