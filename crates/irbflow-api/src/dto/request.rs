//! Request DTOs.

use serde::{Deserialize, Serialize};

use irbflow_core::types::UserId;

/// Body for actions that require a free-text reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonRequest {
    /// The reason for the action.
    pub reason: String,
}

/// Body for reviewer assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignReviewersRequest {
    /// Users to assign as the review committee.
    pub reviewer_ids: Vec<UserId>,
}

/// Body for a reviewer's response to an assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentResponseRequest {
    /// `true` to accept the assignment, `false` to decline.
    pub accept: bool,
}

/// Body for certificate issuance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueCertificateRequest {
    /// Optional link to the rendered certificate document.
    pub certificate_link: Option<String>,
}
