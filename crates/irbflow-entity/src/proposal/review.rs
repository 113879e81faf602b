//! Review records and reviewer assignment state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use irbflow_core::types::UserId;

/// A reviewer's verdict on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    /// Approve as submitted.
    Approve,
    /// Revision required before approval.
    Fix,
    /// Reject outright.
    Reject,
}

impl Vote {
    /// Return the vote as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Fix => "fix",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Vote {
    type Err = irbflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" => Ok(Self::Approve),
            "fix" => Ok(Self::Fix),
            "reject" => Ok(Self::Reject),
            _ => Err(irbflow_core::AppError::validation(format!(
                "Invalid vote: '{s}'. Expected one of: approve, fix, reject"
            ))),
        }
    }
}

/// Per-reviewer acceptance state of an assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewerState {
    /// Assigned but not yet responded.
    #[default]
    Pending,
    /// Accepted the assignment; may vote.
    Accepted,
    /// Declined the assignment.
    Declined,
}

impl ReviewerState {
    /// Return the state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for ReviewerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single reviewer's submitted review.
///
/// At most one review exists per reviewer on a proposal; resubmission
/// before the decision cycle completes overwrites in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// The submitting reviewer.
    pub reviewer_id: UserId,
    /// The reviewer's display name. Concealed from non-admin callers at
    /// the API boundary; stored plainly here.
    pub reviewer_name: String,
    /// The verdict.
    pub vote: Vote,
    /// Free-text comment.
    pub comment: String,
    /// Optional link to an annotated document.
    pub file_link: Option<String>,
    /// When the review was (last) submitted.
    pub submitted_at: DateTime<Utc>,
}
