//! Proposal aggregate: status machine, reviews, revisions, progress
//! reports, and approval detail.

pub mod approval;
pub mod model;
pub mod progress;
pub mod review;
pub mod revision;
pub mod status;

pub use approval::ApprovalDetail;
pub use model::{CreateProposal, Proposal};
pub use progress::{ProgressReport, ReportKind};
pub use review::{Review, ReviewerState, Vote};
pub use revision::RevisionLog;
pub use status::ProposalStatus;
