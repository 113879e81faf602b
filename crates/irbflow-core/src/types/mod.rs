//! Shared type definitions: identifiers and pagination.

pub mod id;
pub mod pagination;

pub use id::{NotificationId, ProposalId, ReportId, UserId};
pub use pagination::{PageRequest, PageResponse};
