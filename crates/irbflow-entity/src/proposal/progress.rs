//! Post-approval progress report records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use irbflow_core::types::{ReportId, UserId};

/// Category of a post-approval monitoring submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Routine six-month progress report.
    SixMonth,
    /// Annual continuation report.
    Annual,
    /// Final report closing the study.
    Closing,
    /// Report of an adverse event.
    AdverseEvent,
    /// Protocol amendment notice.
    Amendment,
}

impl ReportKind {
    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SixMonth => "six_month",
            Self::Annual => "annual",
            Self::Closing => "closing",
            Self::AdverseEvent => "adverse_event",
            Self::Amendment => "amendment",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = irbflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "six_month" => Ok(Self::SixMonth),
            "annual" => Ok(Self::Annual),
            "closing" => Ok(Self::Closing),
            "adverse_event" => Ok(Self::AdverseEvent),
            "amendment" => Ok(Self::Amendment),
            _ => Err(irbflow_core::AppError::validation(format!(
                "Invalid report kind: '{s}'"
            ))),
        }
    }
}

/// A post-approval monitoring submission, independently acknowledgeable
/// by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Unique report identifier.
    pub id: ReportId,
    /// Report category.
    pub kind: ReportKind,
    /// Link to the report document.
    pub file_link: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// When the report was submitted.
    pub submitted_at: DateTime<Utc>,
    /// When the report was acknowledged (presence = acknowledged).
    pub acknowledged_at: Option<DateTime<Utc>>,
    /// The admin who acknowledged the report.
    pub acknowledged_by: Option<UserId>,
}

impl ProgressReport {
    /// Whether an admin has acknowledged this report.
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged_at.is_some()
    }
}
