//! User role enumeration.
//!
//! A user holds a *set* of roles; permission checks must test whether any
//! role in the set grants a capability, never compare a single role.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a user may hold in the review pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Submits proposals and revisions, withdraws, reports progress.
    Researcher,
    /// Academic supervisor who pre-screens a student's proposal.
    Advisor,
    /// Committee member who accepts assignments and votes.
    Reviewer,
    /// Administrative staff running screening, decisions, and certification.
    Admin,
}

impl UserRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Researcher => "researcher",
            Self::Advisor => "advisor",
            Self::Reviewer => "reviewer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = irbflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "researcher" => Ok(Self::Researcher),
            "advisor" => Ok(Self::Advisor),
            "reviewer" => Ok(Self::Reviewer),
            "admin" => Ok(Self::Admin),
            _ => Err(irbflow_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: researcher, advisor, reviewer, admin"
            ))),
        }
    }
}
