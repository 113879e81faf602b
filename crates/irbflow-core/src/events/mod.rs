//! Domain events emitted by IRBFlow operations.
//!
//! Events are produced by the workflow engine after a transition commits
//! and consumed by the notification dispatcher. Statuses and roles are
//! carried as plain strings so that this crate stays free of entity
//! dependencies.

pub mod proposal;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use proposal::ProposalEvent;

use crate::types::UserId;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event (if applicable).
    pub actor_id: Option<UserId>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A proposal-workflow event.
    Proposal(ProposalEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<UserId>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// Create a new proposal event.
    pub fn proposal(actor_id: UserId, event: ProposalEvent) -> Self {
        Self::new(Some(actor_id), EventPayload::Proposal(event))
    }
}
