//! Notification fan-out rules — turns a committed workflow event into
//! notification records, one per recipient.
//!
//! Dispatch is best-effort: it runs after the triggering mutation has
//! committed, a failure here is logged and never rolls that mutation
//! back, and it is never skipped when the mutation succeeds.

use std::sync::Arc;

use tracing::warn;

use irbflow_core::events::{DomainEvent, EventPayload, ProposalEvent};
use irbflow_core::types::{ProposalId, UserId};
use irbflow_entity::notification::Notification;
use irbflow_entity::user::UserRole;
use irbflow_store::traits::{NotificationStore, UserStore};

/// Creates notification records for workflow events.
#[derive(Clone)]
pub struct NotificationDispatcher {
    /// User store, for resolving admin broadcast recipients.
    users: Arc<dyn UserStore>,
    /// Notification sink.
    notifications: Arc<dyn NotificationStore>,
}

impl NotificationDispatcher {
    /// Creates a new dispatcher.
    pub fn new(users: Arc<dyn UserStore>, notifications: Arc<dyn NotificationStore>) -> Self {
        Self {
            users,
            notifications,
        }
    }

    /// Fan a committed event out to its recipients.
    ///
    /// Never returns an error; delivery failures are logged per
    /// recipient and the remaining recipients are still attempted.
    pub async fn dispatch(&self, event: &DomainEvent) {
        let EventPayload::Proposal(proposal_event) = &event.payload;
        match proposal_event {
            ProposalEvent::Created {
                proposal_id,
                code,
                advisor_id,
                ..
            } => {
                let message = format!("Proposal {code} was submitted");
                match advisor_id {
                    Some(advisor) => self.notify(*advisor, proposal_id, &message).await,
                    None => self.broadcast_admins(proposal_id, &message).await,
                }
            }
            ProposalEvent::StatusChanged {
                proposal_id,
                code,
                researcher_id,
                new_status,
                ..
            } => {
                let message = format!("Proposal {code} is now {new_status}");
                self.notify(*researcher_id, proposal_id, &message).await;
            }
            ProposalEvent::ReviewersAssigned {
                proposal_id,
                code,
                reviewer_ids,
            } => {
                let message = format!("You were assigned to review proposal {code}");
                for reviewer_id in reviewer_ids {
                    self.notify(*reviewer_id, proposal_id, &message).await;
                }
            }
            ProposalEvent::ReviewSubmitted {
                proposal_id, code, ..
            } => {
                let message = format!("A review was submitted for proposal {code}");
                self.broadcast_admins(proposal_id, &message).await;
            }
            ProposalEvent::RevisionSubmitted {
                proposal_id,
                code,
                sequence,
            } => {
                let message = format!("Revision #{sequence} was submitted for proposal {code}");
                self.broadcast_admins(proposal_id, &message).await;
            }
            ProposalEvent::ProgressReportSubmitted {
                proposal_id, code, ..
            } => {
                let message = format!("A progress report was submitted for proposal {code}");
                self.broadcast_admins(proposal_id, &message).await;
            }
            ProposalEvent::CertificateIssued {
                proposal_id,
                code,
                researcher_id,
                certificate_number,
            } => {
                let message =
                    format!("Certificate {certificate_number} was issued for proposal {code}");
                self.notify(*researcher_id, proposal_id, &message).await;
            }
        }
    }

    /// Create one notification record for a single recipient.
    async fn notify(&self, user_id: UserId, proposal_id: &ProposalId, message: &str) {
        let link = Some(format!("/proposals/{proposal_id}"));
        let notification = Notification::new(user_id, message, link);
        if let Err(e) = self.notifications.insert(notification).await {
            warn!(%user_id, %proposal_id, error = %e, "Failed to deliver notification");
        }
    }

    /// One notification record per admin.
    async fn broadcast_admins(&self, proposal_id: &ProposalId, message: &str) {
        let admins = match self.users.find_by_role(UserRole::Admin).await {
            Ok(admins) => admins,
            Err(e) => {
                warn!(%proposal_id, error = %e, "Failed to resolve admin broadcast recipients");
                return;
            }
        };
        for admin in admins {
            self.notify(admin.id, proposal_id, message).await;
        }
    }
}
