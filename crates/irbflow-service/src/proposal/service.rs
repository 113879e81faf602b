//! The proposal transition engine.
//!
//! One method per workflow action. Every method follows the same shape:
//! validate input, check the actor's capability, then apply the status
//! precondition, ownership check, and mutation *inside* the store's
//! atomic update closure so that check-then-act sequences are race-free.
//! Notification dispatch runs after the mutation commits and never rolls
//! it back.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use irbflow_core::AppError;
use irbflow_core::config::workflow::WorkflowConfig;
use irbflow_core::events::{DomainEvent, ProposalEvent};
use irbflow_core::result::AppResult;
use irbflow_core::types::pagination::{PageRequest, PageResponse};
use irbflow_core::types::{ProposalId, ReportId, UserId};
use irbflow_entity::permission::Permission;
use irbflow_entity::proposal::{
    ApprovalDetail, CreateProposal, ProgressReport, Proposal, ProposalStatus, ReportKind, Review,
    ReviewerState, RevisionLog, Vote,
};
use irbflow_entity::user::UserRole;
use irbflow_store::traits::{ProposalStore, UserStore};

use crate::context::ActorContext;
use crate::notification::dispatcher::NotificationDispatcher;

use super::code;

/// A reviewer's vote submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    /// The verdict.
    pub vote: Vote,
    /// Free-text comment.
    pub comment: String,
    /// Optional link to an annotated document.
    pub file_link: Option<String>,
}

/// The consolidated committee decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeDecisionRequest {
    /// The decision: approve, fix, or reject.
    pub decision: Vote,
    /// Consolidated feedback text. Required when the decision is `fix`.
    pub feedback: Option<String>,
    /// Optional link to a consolidated feedback document.
    pub file_link: Option<String>,
}

/// A researcher's resubmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRevisionRequest {
    /// Link to the revised document.
    pub file_link: String,
    /// Optional link to a response-to-reviewers note.
    pub note_link: Option<String>,
}

/// A post-approval progress report submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitProgressReportRequest {
    /// Report category.
    pub kind: ReportKind,
    /// Link to the report document.
    pub file_link: String,
    /// Optional free-text description.
    pub description: Option<String>,
}

/// The proposal workflow engine.
#[derive(Clone)]
pub struct ProposalService {
    /// Proposal store.
    proposals: Arc<dyn ProposalStore>,
    /// User store, for code derivation and reviewer validation.
    users: Arc<dyn UserStore>,
    /// Notification fan-out.
    dispatcher: NotificationDispatcher,
    /// Workflow policy knobs.
    workflow: WorkflowConfig,
}

impl ProposalService {
    /// Creates a new proposal service.
    pub fn new(
        proposals: Arc<dyn ProposalStore>,
        users: Arc<dyn UserStore>,
        dispatcher: NotificationDispatcher,
        workflow: WorkflowConfig,
    ) -> Self {
        Self {
            proposals,
            users,
            dispatcher,
            workflow,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Gets a proposal the actor is allowed to see.
    pub async fn get(&self, ctx: &ActorContext, id: ProposalId) -> AppResult<Proposal> {
        let proposal = self.load(id).await?;
        let visible = ctx.has_permission(Permission::ViewReports)
            || proposal.researcher_id == ctx.user_id
            || proposal.advisor_id == Some(ctx.user_id)
            || proposal.reviewers.contains(&ctx.user_id);
        if !visible {
            return Err(AppError::permission_denied(format!(
                "Actor {} may not view proposal {id}",
                ctx.user_id
            )));
        }
        Ok(proposal)
    }

    /// Lists proposals scoped to one of the actor's roles: admins see
    /// all, reviewers see assignments, advisors see advisees' proposals,
    /// researchers see their own.
    pub async fn list(
        &self,
        ctx: &ActorContext,
        role: UserRole,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Proposal>> {
        if !ctx.has_role(role) {
            return Err(AppError::permission_denied(format!(
                "Actor {} does not hold the '{role}' role",
                ctx.user_id
            )));
        }
        match role {
            UserRole::Admin => {
                ctx.require_permission(Permission::ViewReports)?;
                self.proposals.find_all(page).await
            }
            UserRole::Reviewer => self.proposals.find_by_reviewer(ctx.user_id, page).await,
            UserRole::Advisor => self.proposals.find_by_advisor(ctx.user_id, page).await,
            UserRole::Researcher => self.proposals.find_by_researcher(ctx.user_id, page).await,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Creates and submits a new proposal.
    ///
    /// The code is assigned once here and is immutable afterwards. The
    /// initial status depends on whether an advisor pre-screen applies.
    pub async fn create(&self, ctx: &ActorContext, req: CreateProposal) -> AppResult<Proposal> {
        ctx.require_permission(Permission::SubmitProposal)?;
        require_text(&req.title, "title")?;

        let researcher = self
            .users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", ctx.user_id)))?;

        if let Some(advisor_id) = req.advisor_id {
            let advisor = self
                .users
                .find_by_id(advisor_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Advisor {advisor_id} not found")))?;
            if !advisor.has_role(UserRole::Advisor) {
                return Err(AppError::validation(format!(
                    "User {advisor_id} does not hold the advisor role"
                )));
            }
        }

        let year = Utc::now().year();
        let faculty = researcher.affiliation.faculty.clone();
        let sequence = self.proposals.next_code_sequence(&faculty, year).await?;
        let proposal_code = code::proposal_code(&faculty, year, sequence);

        let status = if req.advisor_id.is_some() {
            ProposalStatus::PendingAdvisor
        } else {
            ProposalStatus::PendingAdminCheck
        };

        let now = Utc::now();
        let proposal = Proposal {
            id: ProposalId::new(),
            code: proposal_code,
            title: req.title,
            document_link: req.document_link,
            researcher_id: ctx.user_id,
            advisor_id: req.advisor_id,
            status,
            reviewers: BTreeSet::new(),
            reviewer_states: Default::default(),
            reviews: Vec::new(),
            revision_count: 0,
            revision_history: Vec::new(),
            progress_reports: Vec::new(),
            approval: None,
            certificate_link: None,
            next_report_due: None,
            advisor_feedback: None,
            admin_feedback: None,
            consolidated_feedback: None,
            consolidated_file_link: None,
            withdraw_reason: None,
            suspend_reason: None,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let proposal = self.proposals.insert(proposal).await?;

        info!(
            proposal_id = %proposal.id,
            code = %proposal.code,
            researcher_id = %ctx.user_id,
            status = %proposal.status,
            "Proposal created"
        );

        self.emit(
            ctx,
            ProposalEvent::Created {
                proposal_id: proposal.id,
                code: proposal.code.clone(),
                researcher_id: proposal.researcher_id,
                advisor_id: proposal.advisor_id,
            },
        )
        .await;

        Ok(proposal)
    }

    /// Advisor approves the pre-screen.
    pub async fn advisor_approve(&self, ctx: &ActorContext, id: ProposalId) -> AppResult<Proposal> {
        ctx.require_permission(Permission::ApproveAsAdvisor)?;
        let actor = ctx.user_id;

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::PendingAdvisor)?;
                    require_advisor(p, actor)?;
                    p.status = ProposalStatus::PendingAdminCheck;
                    Ok(())
                }),
            )
            .await?;

        info!(proposal_id = %id, advisor_id = %actor, "Advisor approved proposal");
        self.emit_status_change(ctx, &proposal, ProposalStatus::PendingAdvisor)
            .await;
        Ok(proposal)
    }

    /// Advisor returns the proposal to the researcher with a reason.
    pub async fn advisor_return(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        reason: String,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::ApproveAsAdvisor)?;
        require_text(&reason, "reason")?;
        let actor = ctx.user_id;

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::PendingAdvisor)?;
                    require_advisor(p, actor)?;
                    p.advisor_feedback = Some(reason);
                    p.status = ProposalStatus::AdminRejected;
                    Ok(())
                }),
            )
            .await?;

        info!(proposal_id = %id, advisor_id = %actor, "Advisor returned proposal");
        self.emit_status_change(ctx, &proposal, ProposalStatus::PendingAdvisor)
            .await;
        Ok(proposal)
    }

    /// Admin returns the proposal for fixes before review.
    pub async fn admin_return(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        reason: String,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::AssignReviewers)?;
        require_text(&reason, "reason")?;

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::PendingAdminCheck)?;
                    p.admin_feedback = Some(reason);
                    p.status = ProposalStatus::AdminRejected;
                    Ok(())
                }),
            )
            .await?;

        info!(proposal_id = %id, admin_id = %ctx.user_id, "Proposal returned for fixes");
        self.emit_status_change(ctx, &proposal, ProposalStatus::PendingAdminCheck)
            .await;
        Ok(proposal)
    }

    /// Admin assigns the committee reviewers, starting a review cycle.
    ///
    /// Reviewer states reset to pending and reviews from any previous
    /// cycle are cleared, so completion detection starts from scratch.
    pub async fn assign_reviewers(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        reviewer_ids: Vec<UserId>,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::AssignReviewers)?;
        let reviewers: BTreeSet<UserId> = reviewer_ids.into_iter().collect();
        if reviewers.is_empty() {
            return Err(AppError::validation("Reviewer set must not be empty"));
        }
        for reviewer_id in &reviewers {
            let reviewer = self
                .users
                .find_by_id(*reviewer_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Reviewer {reviewer_id} not found")))?;
            if !reviewer.has_role(UserRole::Reviewer) {
                return Err(AppError::validation(format!(
                    "User {reviewer_id} does not hold the reviewer role"
                )));
            }
        }

        let assigned = reviewers.clone();
        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::PendingAdminCheck)?;
                    p.reviewer_states = assigned
                        .iter()
                        .map(|r| (*r, ReviewerState::Pending))
                        .collect();
                    p.reviewers = assigned;
                    p.reviews.clear();
                    p.status = ProposalStatus::InReview;
                    Ok(())
                }),
            )
            .await?;

        info!(
            proposal_id = %id,
            admin_id = %ctx.user_id,
            reviewer_count = reviewers.len(),
            "Reviewers assigned"
        );
        self.emit(
            ctx,
            ProposalEvent::ReviewersAssigned {
                proposal_id: proposal.id,
                code: proposal.code.clone(),
                reviewer_ids: reviewers.into_iter().collect(),
            },
        )
        .await;
        self.emit_status_change(ctx, &proposal, ProposalStatus::PendingAdminCheck)
            .await;
        Ok(proposal)
    }

    /// Reviewer accepts or declines their assignment.
    pub async fn respond_to_assignment(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        accept: bool,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::VoteAsReviewer)?;
        let actor = ctx.user_id;
        let state = if accept {
            ReviewerState::Accepted
        } else {
            ReviewerState::Declined
        };

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::InReview)?;
                    require_assigned(p, actor)?;
                    p.reviewer_states.insert(actor, state);
                    Ok(())
                }),
            )
            .await?;

        info!(proposal_id = %id, reviewer_id = %actor, state = %state, "Reviewer responded");
        Ok(proposal)
    }

    /// Reviewer submits (or replaces) their vote.
    ///
    /// The review is upserted by reviewer id and, inside the same atomic
    /// update, the completion detector compares the set of submitted
    /// reviewer ids with the assigned set. When they are equal and the
    /// proposal is still in review, it moves to pending-decision exactly
    /// once: concurrent final votes serialize on the store's entry lock,
    /// and whichever lands last observes the completed set.
    pub async fn submit_review(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        req: SubmitReviewRequest,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::VoteAsReviewer)?;
        let actor = ctx.user_id;
        let review = Review {
            reviewer_id: actor,
            reviewer_name: ctx.name.clone(),
            vote: req.vote,
            comment: req.comment,
            file_link: req.file_link,
            submitted_at: Utc::now(),
        };

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::InReview)?;
                    require_assigned(p, actor)?;
                    if p.reviewer_state(actor) != ReviewerState::Accepted {
                        return Err(AppError::precondition_failed(format!(
                            "Reviewer {actor} has not accepted the assignment"
                        )));
                    }
                    p.upsert_review(review);
                    if p.all_reviews_submitted() {
                        p.status = ProposalStatus::PendingDecision;
                    }
                    Ok(())
                }),
            )
            .await?;

        info!(
            proposal_id = %id,
            reviewer_id = %actor,
            vote = %req.vote,
            completed = proposal.status == ProposalStatus::PendingDecision,
            "Review submitted"
        );
        self.emit(
            ctx,
            ProposalEvent::ReviewSubmitted {
                proposal_id: proposal.id,
                code: proposal.code.clone(),
                reviewer_id: actor,
            },
        )
        .await;
        if proposal.status == ProposalStatus::PendingDecision {
            self.emit_status_change(ctx, &proposal, ProposalStatus::InReview)
                .await;
        }
        Ok(proposal)
    }

    /// Admin consolidates the reviews into a final decision.
    pub async fn finalize_decision(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        req: FinalizeDecisionRequest,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::FinalizeDecision)?;
        if req.decision == Vote::Fix && req.feedback.as_deref().unwrap_or("").trim().is_empty() {
            return Err(AppError::validation(
                "Consolidated feedback is required when requesting fixes",
            ));
        }

        let next_status = match req.decision {
            Vote::Fix => ProposalStatus::RevisionRequested,
            Vote::Reject => ProposalStatus::Rejected,
            Vote::Approve => ProposalStatus::WaitingCertificate,
        };

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::PendingDecision)?;
                    p.consolidated_feedback = req.feedback;
                    p.consolidated_file_link = req.file_link;
                    p.status = next_status;
                    Ok(())
                }),
            )
            .await?;

        info!(
            proposal_id = %id,
            admin_id = %ctx.user_id,
            decision = %req.decision,
            "Decision finalized"
        );
        self.emit_status_change(ctx, &proposal, ProposalStatus::PendingDecision)
            .await;
        Ok(proposal)
    }

    /// Admin issues the approval certificate.
    ///
    /// On the first issuance of a cycle the certificate number is derived
    /// from the monotonic store counter and the validity window opens at
    /// today's date. A pre-existing approval detail (an earlier cycle) is
    /// left untouched; issuance never re-derives it.
    pub async fn issue_certificate(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        certificate_link: Option<String>,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::FinalizeDecision)?;

        let current = self.load(id).await?;
        require_status(&current, ProposalStatus::WaitingCertificate)?;

        let derived = if current.approval.is_none() {
            let sequence = self.proposals.next_certificate_sequence().await?;
            let issuance = Utc::now().date_naive();
            let expiry = issuance
                .checked_add_months(Months::new(self.workflow.certificate_validity_months))
                .ok_or_else(|| AppError::internal("Certificate expiry date out of range"))?;
            Some(ApprovalDetail {
                certificate_number: code::certificate_number(
                    &self.workflow.certificate_prefix,
                    sequence,
                ),
                issuance_date: issuance,
                expiry_date: expiry,
            })
        } else {
            None
        };

        let next_due = Utc::now()
            .date_naive()
            .checked_add_months(Months::new(self.workflow.report_interval_months))
            .ok_or_else(|| AppError::internal("Report due date out of range"))?;

        let proposal = self
            .proposals
            .update(
                id,
                Some(current.version),
                Box::new(move |p| {
                    require_status(p, ProposalStatus::WaitingCertificate)?;
                    if p.approval.is_none() {
                        p.approval = derived;
                    }
                    p.certificate_link = certificate_link;
                    p.next_report_due = Some(next_due);
                    p.status = ProposalStatus::Approved;
                    Ok(())
                }),
            )
            .await?;

        let certificate_number = proposal
            .approval
            .as_ref()
            .map(|a| a.certificate_number.clone())
            .unwrap_or_default();
        info!(
            proposal_id = %id,
            admin_id = %ctx.user_id,
            certificate = %certificate_number,
            "Certificate issued"
        );
        self.emit(
            ctx,
            ProposalEvent::CertificateIssued {
                proposal_id: proposal.id,
                code: proposal.code.clone(),
                researcher_id: proposal.researcher_id,
                certificate_number,
            },
        )
        .await;
        self.emit_status_change(ctx, &proposal, ProposalStatus::WaitingCertificate)
            .await;
        Ok(proposal)
    }

    /// Researcher submits a revision after a return or fix decision.
    pub async fn submit_revision(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        req: SubmitRevisionRequest,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::SubmitRevision)?;
        require_text(&req.file_link, "file_link")?;
        let actor = ctx.user_id;

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    if !matches!(
                        p.status,
                        ProposalStatus::RevisionRequested | ProposalStatus::AdminRejected
                    ) {
                        return Err(wrong_status(p, "revision_requested or admin_rejected"));
                    }
                    require_researcher(p, actor)?;
                    // Snapshot the prompting feedback before the status flips,
                    // so later feedback edits cannot rewrite this entry.
                    let feedback_snapshot = p.pending_feedback();
                    p.revision_count += 1;
                    p.revision_history.push(RevisionLog {
                        sequence: p.revision_count,
                        submitted_at: Utc::now(),
                        file_link: req.file_link,
                        note_link: req.note_link,
                        feedback_snapshot,
                    });
                    p.status = ProposalStatus::PendingAdminCheck;
                    Ok(())
                }),
            )
            .await?;

        info!(
            proposal_id = %id,
            researcher_id = %actor,
            revision = proposal.revision_count,
            "Revision submitted"
        );
        self.emit(
            ctx,
            ProposalEvent::RevisionSubmitted {
                proposal_id: proposal.id,
                code: proposal.code.clone(),
                sequence: proposal.revision_count,
            },
        )
        .await;
        Ok(proposal)
    }

    /// Researcher withdraws the proposal. Terminal.
    pub async fn withdraw(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        reason: String,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::WithdrawProposal)?;
        require_text(&reason, "reason")?;
        let actor = ctx.user_id;
        let old_status = self.load(id).await?.status;

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_researcher(p, actor)?;
                    if !p.status.allows_withdraw() {
                        return Err(wrong_status(p, "any withdrawable status"));
                    }
                    p.withdraw_reason = Some(reason);
                    p.status = ProposalStatus::Withdrawn;
                    Ok(())
                }),
            )
            .await?;

        info!(proposal_id = %id, researcher_id = %actor, "Proposal withdrawn");
        self.emit_status_change(ctx, &proposal, old_status).await;
        Ok(proposal)
    }

    /// Researcher requests renewal of an approved proposal.
    pub async fn request_renewal(&self, ctx: &ActorContext, id: ProposalId) -> AppResult<Proposal> {
        ctx.require_permission(Permission::RequestRenewal)?;
        let actor = ctx.user_id;

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::Approved)?;
                    require_researcher(p, actor)?;
                    p.status = ProposalStatus::RenewalRequested;
                    Ok(())
                }),
            )
            .await?;

        info!(proposal_id = %id, researcher_id = %actor, "Renewal requested");
        self.emit_status_change(ctx, &proposal, ProposalStatus::Approved)
            .await;
        Ok(proposal)
    }

    /// Admin approves a renewal, extending the certificate's validity.
    ///
    /// Only the expiry date moves; the certificate number and issuance
    /// date are never touched by renewal.
    pub async fn approve_renewal(&self, ctx: &ActorContext, id: ProposalId) -> AppResult<Proposal> {
        ctx.require_permission(Permission::AssignReviewers)?;
        let extension = self.workflow.renewal_extension_months;
        let next_due = Utc::now()
            .date_naive()
            .checked_add_months(Months::new(self.workflow.report_interval_months))
            .ok_or_else(|| AppError::internal("Report due date out of range"))?;

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::RenewalRequested)?;
                    let approval = p.approval.as_mut().ok_or_else(|| {
                        AppError::precondition_failed(
                            "Proposal has no certificate on record to renew",
                        )
                    })?;
                    approval.expiry_date = approval
                        .expiry_date
                        .checked_add_months(Months::new(extension))
                        .ok_or_else(|| AppError::internal("Expiry date out of range"))?;
                    p.next_report_due = Some(next_due);
                    p.status = ProposalStatus::Approved;
                    Ok(())
                }),
            )
            .await?;

        info!(proposal_id = %id, admin_id = %ctx.user_id, "Renewal approved");
        self.emit_status_change(ctx, &proposal, ProposalStatus::RenewalRequested)
            .await;
        Ok(proposal)
    }

    /// Admin suspends an approved proposal.
    pub async fn suspend(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        reason: String,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::ManageUsers)?;
        require_text(&reason, "reason")?;

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::Approved)?;
                    p.suspend_reason = Some(reason);
                    p.status = ProposalStatus::Suspended;
                    Ok(())
                }),
            )
            .await?;

        info!(proposal_id = %id, admin_id = %ctx.user_id, "Proposal suspended");
        self.emit_status_change(ctx, &proposal, ProposalStatus::Approved)
            .await;
        Ok(proposal)
    }

    /// Administrative escape hatch: send the proposal back to screening
    /// from any non-terminal status.
    pub async fn force_reset(&self, ctx: &ActorContext, id: ProposalId) -> AppResult<Proposal> {
        ctx.require_permission(Permission::ManageUsers)?;
        let old_status = self.load(id).await?.status;

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    if p.status.is_terminal() {
                        return Err(wrong_status(p, "any non-terminal status"));
                    }
                    p.status = ProposalStatus::PendingAdminCheck;
                    Ok(())
                }),
            )
            .await?;

        info!(proposal_id = %id, admin_id = %ctx.user_id, "Proposal force-reset");
        self.emit_status_change(ctx, &proposal, old_status).await;
        Ok(proposal)
    }

    /// Researcher submits a post-approval progress report.
    pub async fn submit_progress_report(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        req: SubmitProgressReportRequest,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::SubmitProgressReport)?;
        require_text(&req.file_link, "file_link")?;
        let actor = ctx.user_id;
        let report_id = ReportId::new();
        let report = ProgressReport {
            id: report_id,
            kind: req.kind,
            file_link: req.file_link,
            description: req.description,
            submitted_at: Utc::now(),
            acknowledged_at: None,
            acknowledged_by: None,
        };

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::Approved)?;
                    require_researcher(p, actor)?;
                    p.progress_reports.push(report);
                    Ok(())
                }),
            )
            .await?;

        info!(
            proposal_id = %id,
            researcher_id = %actor,
            report_id = %report_id,
            kind = %req.kind,
            "Progress report submitted"
        );
        self.emit(
            ctx,
            ProposalEvent::ProgressReportSubmitted {
                proposal_id: proposal.id,
                code: proposal.code.clone(),
                report_id,
            },
        )
        .await;
        Ok(proposal)
    }

    /// Admin acknowledges a submitted progress report.
    pub async fn acknowledge_progress_report(
        &self,
        ctx: &ActorContext,
        id: ProposalId,
        report_id: ReportId,
    ) -> AppResult<Proposal> {
        ctx.require_permission(Permission::AcknowledgeProgressReport)?;
        let actor = ctx.user_id;

        let proposal = self
            .proposals
            .update(
                id,
                None,
                Box::new(move |p| {
                    require_status(p, ProposalStatus::Approved)?;
                    let report = p.progress_report_mut(report_id).ok_or_else(|| {
                        AppError::not_found(format!("Progress report {report_id} not found"))
                    })?;
                    if report.is_acknowledged() {
                        return Err(AppError::precondition_failed(format!(
                            "Progress report {report_id} is already acknowledged"
                        )));
                    }
                    report.acknowledged_at = Some(Utc::now());
                    report.acknowledged_by = Some(actor);
                    Ok(())
                }),
            )
            .await?;

        info!(proposal_id = %id, admin_id = %actor, report_id = %report_id, "Progress report acknowledged");
        Ok(proposal)
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn load(&self, id: ProposalId) -> AppResult<Proposal> {
        self.proposals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Proposal {id} not found")))
    }

    async fn emit(&self, ctx: &ActorContext, event: ProposalEvent) {
        self.dispatcher
            .dispatch(&DomainEvent::proposal(ctx.user_id, event))
            .await;
    }

    async fn emit_status_change(
        &self,
        ctx: &ActorContext,
        proposal: &Proposal,
        old_status: ProposalStatus,
    ) {
        self.emit(
            ctx,
            ProposalEvent::StatusChanged {
                proposal_id: proposal.id,
                code: proposal.code.clone(),
                researcher_id: proposal.researcher_id,
                old_status: old_status.to_string(),
                new_status: proposal.status.to_string(),
            },
        )
        .await;
    }
}

/// Fail unless the proposal is exactly in `expected`.
fn require_status(proposal: &Proposal, expected: ProposalStatus) -> AppResult<()> {
    if proposal.status == expected {
        Ok(())
    } else {
        Err(wrong_status(proposal, expected.as_str()))
    }
}

fn wrong_status(proposal: &Proposal, expected: &str) -> AppError {
    AppError::precondition_failed(format!(
        "Proposal {} is {}, expected {expected}",
        proposal.id, proposal.status
    ))
}

/// Ownership check: the actor must be the proposal's researcher.
fn require_researcher(proposal: &Proposal, actor: UserId) -> AppResult<()> {
    if proposal.researcher_id == actor {
        Ok(())
    } else {
        Err(AppError::precondition_failed(format!(
            "Actor {actor} is not the researcher of proposal {}",
            proposal.id
        )))
    }
}

/// Ownership check: the actor must be the proposal's advisor.
fn require_advisor(proposal: &Proposal, actor: UserId) -> AppResult<()> {
    if proposal.advisor_id == Some(actor) {
        Ok(())
    } else {
        Err(AppError::precondition_failed(format!(
            "Actor {actor} is not the advisor of proposal {}",
            proposal.id
        )))
    }
}

/// The actor must be in the assigned reviewer set.
fn require_assigned(proposal: &Proposal, actor: UserId) -> AppResult<()> {
    if proposal.reviewers.contains(&actor) {
        Ok(())
    } else {
        Err(AppError::precondition_failed(format!(
            "Actor {actor} is not an assigned reviewer of proposal {}",
            proposal.id
        )))
    }
}

/// Required free-text field must be non-empty after trimming.
fn require_text(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        Err(AppError::validation(format!("Field '{field}' is required")))
    } else {
        Ok(())
    }
}
