//! Static role → permission policy table.
//!
//! The table is plain data: adding a role or permission means extending
//! the match arms here, never touching transition logic.

use std::collections::BTreeSet;

use crate::user::UserRole;

use super::action::Permission;

/// The permissions granted by a single role.
pub fn permissions_for(role: UserRole) -> &'static [Permission] {
    match role {
        UserRole::Researcher => &[
            Permission::SubmitProposal,
            Permission::SubmitRevision,
            Permission::SubmitProgressReport,
            Permission::WithdrawProposal,
            Permission::RequestRenewal,
        ],
        UserRole::Advisor => &[Permission::ApproveAsAdvisor],
        UserRole::Reviewer => &[Permission::VoteAsReviewer],
        UserRole::Admin => &[
            Permission::AssignReviewers,
            Permission::FinalizeDecision,
            Permission::AcknowledgeProgressReport,
            Permission::ManageUsers,
            Permission::ViewReports,
        ],
    }
}

/// Whether any role in the set grants the permission.
///
/// Roles are a set, not a single value; a user holding several roles has
/// the union of their capabilities.
pub fn has_permission(roles: &BTreeSet<UserRole>, permission: Permission) -> bool {
    roles
        .iter()
        .any(|role| permissions_for(*role).contains(&permission))
}
