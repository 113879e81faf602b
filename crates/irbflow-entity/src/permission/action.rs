//! Permission definitions gating workflow actions.

use serde::{Deserialize, Serialize};

/// Named capabilities checked before every workflow transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create and submit a new proposal.
    SubmitProposal,
    /// Approve or return a proposal as its advisor.
    ApproveAsAdvisor,
    /// Screen proposals and assign committee reviewers.
    AssignReviewers,
    /// Accept/decline an assignment and submit a review vote.
    VoteAsReviewer,
    /// Consolidate reviews into a final decision and issue certificates.
    FinalizeDecision,
    /// Resubmit a revised proposal.
    SubmitRevision,
    /// Submit a post-approval progress report.
    SubmitProgressReport,
    /// Acknowledge a submitted progress report.
    AcknowledgeProgressReport,
    /// Withdraw an in-flight proposal.
    WithdrawProposal,
    /// Request renewal of an approved proposal.
    RequestRenewal,
    /// Manage user accounts and perform administrative overrides.
    ManageUsers,
    /// View reports and cross-proposal listings.
    ViewReports,
}

impl Permission {
    /// Return the permission as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubmitProposal => "proposal:submit",
            Self::ApproveAsAdvisor => "proposal:advisor_approve",
            Self::AssignReviewers => "proposal:assign_reviewers",
            Self::VoteAsReviewer => "proposal:vote",
            Self::FinalizeDecision => "proposal:finalize",
            Self::SubmitRevision => "proposal:revise",
            Self::SubmitProgressReport => "report:submit",
            Self::AcknowledgeProgressReport => "report:acknowledge",
            Self::WithdrawProposal => "proposal:withdraw",
            Self::RequestRenewal => "proposal:renew",
            Self::ManageUsers => "user:manage",
            Self::ViewReports => "report:view",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
