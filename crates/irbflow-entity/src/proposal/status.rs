//! Proposal status enumeration.
//!
//! This closed set is the single source of truth for proposal state;
//! collaborators only ever read it. Legality of a transition is decided
//! by the engine, never by comparing status strings elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow status of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Being drafted, not yet submitted.
    Draft,
    /// Waiting for the advisor's pre-screen.
    PendingAdvisor,
    /// Waiting for administrative screening.
    PendingAdminCheck,
    /// Returned to the researcher for fixes before review.
    AdminRejected,
    /// Under committee review.
    InReview,
    /// The committee decision requires a revision.
    RevisionRequested,
    /// All reviews are in; waiting for the consolidated decision.
    PendingDecision,
    /// Approved pending certificate issuance.
    WaitingCertificate,
    /// Approved with a valid certificate.
    Approved,
    /// Rejected by the committee. Terminal.
    Rejected,
    /// Approval suspended by an administrator.
    Suspended,
    /// Withdrawn by the researcher. Terminal.
    Withdrawn,
    /// Renewal requested by the researcher.
    RenewalRequested,
}

impl ProposalStatus {
    /// Whether no further transitions are defined from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Withdrawn)
    }

    /// Whether the researcher may withdraw from this status.
    pub fn allows_withdraw(&self) -> bool {
        !matches!(self, Self::Approved | Self::Rejected | Self::Withdrawn)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingAdvisor => "pending_advisor",
            Self::PendingAdminCheck => "pending_admin_check",
            Self::AdminRejected => "admin_rejected",
            Self::InReview => "in_review",
            Self::RevisionRequested => "revision_requested",
            Self::PendingDecision => "pending_decision",
            Self::WaitingCertificate => "waiting_certificate",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Suspended => "suspended",
            Self::Withdrawn => "withdrawn",
            Self::RenewalRequested => "renewal_requested",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = irbflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "pending_advisor" => Ok(Self::PendingAdvisor),
            "pending_admin_check" => Ok(Self::PendingAdminCheck),
            "admin_rejected" => Ok(Self::AdminRejected),
            "in_review" => Ok(Self::InReview),
            "revision_requested" => Ok(Self::RevisionRequested),
            "pending_decision" => Ok(Self::PendingDecision),
            "waiting_certificate" => Ok(Self::WaitingCertificate),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "suspended" => Ok(Self::Suspended),
            "withdrawn" => Ok(Self::Withdrawn),
            "renewal_requested" => Ok(Self::RenewalRequested),
            _ => Err(irbflow_core::AppError::validation(format!(
                "Invalid proposal status: '{s}'"
            ))),
        }
    }
}
