//! Response DTOs.
//!
//! Proposals are never returned raw: [`ProposalResponse`] projects the
//! aggregate for the caller, concealing reviewer identities from anyone
//! who is not an administrator. Concealment lives entirely here at the
//! API boundary; the engine stores reviews with their authors.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use irbflow_core::types::pagination::PageResponse;
use irbflow_core::types::{NotificationId, ProposalId, UserId};
use irbflow_entity::notification::Notification;
use irbflow_entity::proposal::{
    ApprovalDetail, ProgressReport, Proposal, ReviewerState, RevisionLog, Vote,
};
use irbflow_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple count payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// The count.
    pub count: u64,
}

/// Simple message payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// A review as exposed to API callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    /// The submitting reviewer. Absent for non-admin callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<UserId>,
    /// The reviewer's display name. Absent for non-admin callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_name: Option<String>,
    /// The verdict.
    pub vote: Vote,
    /// Free-text comment.
    pub comment: String,
    /// Optional link to an annotated document.
    pub file_link: Option<String>,
    /// When the review was submitted.
    pub submitted_at: DateTime<Utc>,
}

/// A proposal as exposed to API callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalResponse {
    /// Unique proposal identifier.
    pub id: ProposalId,
    /// Human-readable proposal code.
    pub code: String,
    /// Proposal title.
    pub title: String,
    /// Link to the submitted document.
    pub document_link: Option<String>,
    /// The submitting researcher.
    pub researcher_id: UserId,
    /// The pre-screening advisor, if any.
    pub advisor_id: Option<UserId>,
    /// Current workflow status.
    pub status: String,
    /// Assigned reviewer ids. Absent for non-admin callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<UserId>>,
    /// Per-reviewer assignment states. Absent for non-admin callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_states: Option<Vec<(UserId, ReviewerState)>>,
    /// Submitted reviews, identity-projected per caller.
    pub reviews: Vec<ReviewResponse>,
    /// Number of completed revision cycles.
    pub revision_count: u32,
    /// Resubmission history.
    pub revision_history: Vec<RevisionLog>,
    /// Post-approval monitoring submissions.
    pub progress_reports: Vec<ProgressReport>,
    /// Certificate detail, if issued.
    pub approval: Option<ApprovalDetail>,
    /// Link to the issued certificate document.
    pub certificate_link: Option<String>,
    /// When the next progress report is due.
    pub next_report_due: Option<NaiveDate>,
    /// Feedback from an advisor return.
    pub advisor_feedback: Option<String>,
    /// Feedback from an admin return.
    pub admin_feedback: Option<String>,
    /// Consolidated committee feedback.
    pub consolidated_feedback: Option<String>,
    /// Link to the consolidated feedback document.
    pub consolidated_file_link: Option<String>,
    /// Reason given on withdraw.
    pub withdraw_reason: Option<String>,
    /// Reason given on suspension.
    pub suspend_reason: Option<String>,
    /// Optimistic-concurrency token.
    pub version: u64,
    /// When the proposal was created.
    pub created_at: DateTime<Utc>,
    /// When the proposal was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ProposalResponse {
    /// Projects a proposal for a caller. `reveal_reviewers` is true only
    /// for administrators; everyone else sees anonymized reviews and no
    /// assignment roster.
    pub fn project(proposal: Proposal, reveal_reviewers: bool) -> Self {
        let reviews = proposal
            .reviews
            .into_iter()
            .map(|r| ReviewResponse {
                reviewer_id: reveal_reviewers.then_some(r.reviewer_id),
                reviewer_name: reveal_reviewers.then_some(r.reviewer_name),
                vote: r.vote,
                comment: r.comment,
                file_link: r.file_link,
                submitted_at: r.submitted_at,
            })
            .collect();

        Self {
            id: proposal.id,
            code: proposal.code,
            title: proposal.title,
            document_link: proposal.document_link,
            researcher_id: proposal.researcher_id,
            advisor_id: proposal.advisor_id,
            status: proposal.status.to_string(),
            reviewers: reveal_reviewers.then(|| proposal.reviewers.into_iter().collect()),
            reviewer_states: reveal_reviewers
                .then(|| proposal.reviewer_states.into_iter().collect()),
            reviews,
            revision_count: proposal.revision_count,
            revision_history: proposal.revision_history,
            progress_reports: proposal.progress_reports,
            approval: proposal.approval,
            certificate_link: proposal.certificate_link,
            next_report_due: proposal.next_report_due,
            advisor_feedback: proposal.advisor_feedback,
            admin_feedback: proposal.admin_feedback,
            consolidated_feedback: proposal.consolidated_feedback,
            consolidated_file_link: proposal.consolidated_file_link,
            withdraw_reason: proposal.withdraw_reason,
            suspend_reason: proposal.suspend_reason,
            version: proposal.version,
            created_at: proposal.created_at,
            updated_at: proposal.updated_at,
        }
    }

    /// Projects a whole page of proposals.
    pub fn project_page(
        page: PageResponse<Proposal>,
        reveal_reviewers: bool,
    ) -> PageResponse<ProposalResponse> {
        PageResponse {
            items: page
                .items
                .into_iter()
                .map(|p| Self::project(p, reveal_reviewers))
                .collect(),
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
            has_next: page.has_next,
            has_previous: page.has_previous,
        }
    }
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Roles held.
    pub roles: Vec<String>,
    /// Classification.
    pub kind: Option<String>,
    /// Campus.
    pub campus: String,
    /// Faculty.
    pub faculty: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            roles: user.roles.iter().map(|r| r.to_string()).collect(),
            kind: user.kind.map(|k| k.to_string()),
            campus: user.affiliation.campus,
            faculty: user.affiliation.faculty,
            created_at: user.created_at,
        }
    }
}

/// Notification summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    /// Notification ID.
    pub id: NotificationId,
    /// Message text.
    pub message: String,
    /// Optional deep link.
    pub link: Option<String>,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            message: n.message,
            link: n.link,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}
