//! Notification read API.

use std::sync::Arc;

use irbflow_core::AppError;
use irbflow_core::types::NotificationId;
use irbflow_core::types::pagination::{PageRequest, PageResponse};
use irbflow_entity::notification::Notification;
use irbflow_store::traits::NotificationStore;

use crate::context::ActorContext;

/// Read and mark-read operations over a user's own notifications.
#[derive(Clone)]
pub struct NotificationService {
    /// Notification store.
    notifications: Arc<dyn NotificationStore>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }

    /// Lists notifications for the current user.
    pub async fn list(
        &self,
        ctx: &ActorContext,
        page: &PageRequest,
    ) -> Result<PageResponse<Notification>, AppError> {
        self.notifications.find_by_user(ctx.user_id, page).await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &ActorContext) -> Result<u64, AppError> {
        self.notifications.count_unread(ctx.user_id).await
    }

    /// Marks a notification as read.
    pub async fn mark_read(
        &self,
        ctx: &ActorContext,
        notification_id: NotificationId,
    ) -> Result<(), AppError> {
        self.notifications
            .mark_read(notification_id, ctx.user_id)
            .await
    }

    /// Marks all notifications as read for the current user.
    pub async fn mark_all_read(&self, ctx: &ActorContext) -> Result<u64, AppError> {
        self.notifications.mark_all_read(ctx.user_id).await
    }
}
