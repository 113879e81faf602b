//! Proposal-workflow domain events.

use serde::{Deserialize, Serialize};

use crate::types::{ProposalId, ReportId, UserId};

/// Events emitted by the proposal transition engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProposalEvent {
    /// A new proposal was created.
    Created {
        /// The proposal ID.
        proposal_id: ProposalId,
        /// The human-readable proposal code.
        code: String,
        /// The submitting researcher.
        researcher_id: UserId,
        /// The assigned advisor, if any.
        advisor_id: Option<UserId>,
    },
    /// The proposal moved to a new status.
    StatusChanged {
        /// The proposal ID.
        proposal_id: ProposalId,
        /// The human-readable proposal code.
        code: String,
        /// The proposal's owner.
        researcher_id: UserId,
        /// The previous status.
        old_status: String,
        /// The new status.
        new_status: String,
    },
    /// Reviewers were assigned to the proposal.
    ReviewersAssigned {
        /// The proposal ID.
        proposal_id: ProposalId,
        /// The human-readable proposal code.
        code: String,
        /// The assigned reviewers.
        reviewer_ids: Vec<UserId>,
    },
    /// A reviewer submitted (or replaced) a vote.
    ReviewSubmitted {
        /// The proposal ID.
        proposal_id: ProposalId,
        /// The human-readable proposal code.
        code: String,
        /// The submitting reviewer.
        reviewer_id: UserId,
    },
    /// The researcher submitted a revision.
    RevisionSubmitted {
        /// The proposal ID.
        proposal_id: ProposalId,
        /// The human-readable proposal code.
        code: String,
        /// The 1-based revision sequence number.
        sequence: u32,
    },
    /// The researcher submitted a post-approval progress report.
    ProgressReportSubmitted {
        /// The proposal ID.
        proposal_id: ProposalId,
        /// The human-readable proposal code.
        code: String,
        /// The report ID.
        report_id: ReportId,
    },
    /// A certificate was issued for the proposal.
    CertificateIssued {
        /// The proposal ID.
        proposal_id: ProposalId,
        /// The human-readable proposal code.
        code: String,
        /// The proposal's owner.
        researcher_id: UserId,
        /// The derived certificate number.
        certificate_number: String,
    },
}

impl ProposalEvent {
    /// The proposal this event concerns.
    pub fn proposal_id(&self) -> ProposalId {
        match self {
            Self::Created { proposal_id, .. }
            | Self::StatusChanged { proposal_id, .. }
            | Self::ReviewersAssigned { proposal_id, .. }
            | Self::ReviewSubmitted { proposal_id, .. }
            | Self::RevisionSubmitted { proposal_id, .. }
            | Self::ProgressReportSubmitted { proposal_id, .. }
            | Self::CertificateIssued { proposal_id, .. } => *proposal_id,
        }
    }
}
