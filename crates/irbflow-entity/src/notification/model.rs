//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use irbflow_core::types::{NotificationId, UserId};

/// A notification created by the workflow engine for one recipient.
///
/// Only the engine produces these; callers can only read them and flip
/// the read flag through the notification API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// Notification body text.
    pub message: String,
    /// Optional link to the concerned resource.
    pub link: Option<String>,
    /// Whether the user has read this notification.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create an unread notification for a recipient.
    pub fn new(user_id: UserId, message: impl Into<String>, link: Option<String>) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            message: message.into(),
            link,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
