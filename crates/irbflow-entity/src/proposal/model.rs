//! Proposal aggregate model.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use irbflow_core::types::{ProposalId, ReportId, UserId};

use super::approval::ApprovalDetail;
use super::progress::ProgressReport;
use super::review::{Review, ReviewerState};
use super::revision::RevisionLog;
use super::status::ProposalStatus;

/// The central aggregate: a research-ethics proposal and all of its
/// workflow records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique proposal identifier.
    pub id: ProposalId,
    /// Human-readable code derived from faculty + year + sequence.
    /// Assigned once at creation, immutable thereafter.
    pub code: String,
    /// Proposal title.
    pub title: String,
    /// Link to the submitted proposal document (opaque to the engine).
    pub document_link: Option<String>,
    /// The submitting researcher (owner for withdraw/revision actions).
    pub researcher_id: UserId,
    /// The advisor pre-screening the proposal, if any.
    pub advisor_id: Option<UserId>,
    /// Current workflow status.
    pub status: ProposalStatus,
    /// Assigned committee reviewers (no duplicates, order immaterial).
    pub reviewers: BTreeSet<UserId>,
    /// Per-reviewer assignment acceptance state.
    pub reviewer_states: BTreeMap<UserId, ReviewerState>,
    /// Submitted reviews, at most one per reviewer.
    pub reviews: Vec<Review>,
    /// Number of revision cycles; always equals `revision_history.len()`.
    pub revision_count: u32,
    /// Append-only log of resubmission cycles.
    pub revision_history: Vec<RevisionLog>,
    /// Post-approval monitoring submissions.
    pub progress_reports: Vec<ProgressReport>,
    /// Certificate detail, set once per approval cycle.
    pub approval: Option<ApprovalDetail>,
    /// Link to the issued certificate document.
    pub certificate_link: Option<String>,
    /// When the next progress report is due (set on approval/renewal).
    pub next_report_due: Option<NaiveDate>,
    /// Feedback stored by an advisor return.
    pub advisor_feedback: Option<String>,
    /// Feedback stored by an admin return-for-fix.
    pub admin_feedback: Option<String>,
    /// Consolidated committee feedback stored by the final decision.
    pub consolidated_feedback: Option<String>,
    /// Link to the consolidated feedback document.
    pub consolidated_file_link: Option<String>,
    /// Reason stored by a withdraw.
    pub withdraw_reason: Option<String>,
    /// Reason stored by an administrative suspension.
    pub suspend_reason: Option<String>,
    /// Monotonically incremented on every committed mutation; the
    /// optimistic-concurrency token.
    pub version: u64,
    /// When the proposal was created.
    pub created_at: DateTime<Utc>,
    /// When the proposal was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProposal {
    /// Proposal title.
    pub title: String,
    /// Link to the proposal document.
    pub document_link: Option<String>,
    /// Advisor to pre-screen the proposal, if any.
    pub advisor_id: Option<UserId>,
}

impl Proposal {
    /// The reviewer ids that have a submitted review.
    pub fn submitted_reviewer_ids(&self) -> BTreeSet<UserId> {
        self.reviews.iter().map(|r| r.reviewer_id).collect()
    }

    /// Whether every assigned reviewer has a submitted review.
    ///
    /// Compares the *sets* of ids, not counts, so a reviewer swapped out
    /// after submitting does not spuriously complete the cycle.
    pub fn all_reviews_submitted(&self) -> bool {
        !self.reviewers.is_empty() && self.submitted_reviewer_ids() == self.reviewers
    }

    /// The assignment state of a reviewer, defaulting to pending for any
    /// assigned reviewer not yet present in the state map.
    pub fn reviewer_state(&self, reviewer_id: UserId) -> ReviewerState {
        self.reviewer_states
            .get(&reviewer_id)
            .copied()
            .unwrap_or_default()
    }

    /// Insert or replace the review for `review.reviewer_id`.
    ///
    /// An upsert keyed by reviewer id, never an append: resubmission
    /// overwrites in place.
    pub fn upsert_review(&mut self, review: Review) {
        match self
            .reviews
            .iter_mut()
            .find(|r| r.reviewer_id == review.reviewer_id)
        {
            Some(existing) => *existing = review,
            None => self.reviews.push(review),
        }
    }

    /// Find a progress report by id.
    pub fn progress_report_mut(&mut self, report_id: ReportId) -> Option<&mut ProgressReport> {
        self.progress_reports.iter_mut().find(|r| r.id == report_id)
    }

    /// The feedback that would prompt a revision from the current status.
    pub fn pending_feedback(&self) -> Option<String> {
        match self.status {
            ProposalStatus::AdminRejected => self
                .admin_feedback
                .clone()
                .or_else(|| self.advisor_feedback.clone()),
            ProposalStatus::RevisionRequested => self.consolidated_feedback.clone(),
            _ => None,
        }
    }
}
