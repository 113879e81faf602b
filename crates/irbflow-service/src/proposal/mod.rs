//! Proposal workflow engine.

pub mod code;
pub mod service;

pub use service::{
    FinalizeDecisionRequest, ProposalService, SubmitProgressReportRequest, SubmitReviewRequest,
    SubmitRevisionRequest,
};
