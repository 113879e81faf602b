//! Approval certificate detail.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Certificate number and validity dates for an approved proposal.
///
/// Set exactly once per approval cycle. Renewal moves `expiry_date`
/// forward; `certificate_number` and `issuance_date` never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDetail {
    /// The derived certificate number, e.g. `REC-000123`.
    pub certificate_number: String,
    /// The date the certificate was issued.
    pub issuance_date: NaiveDate,
    /// The date the certificate expires.
    pub expiry_date: NaiveDate,
}
