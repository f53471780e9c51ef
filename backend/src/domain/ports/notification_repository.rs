//! Port abstraction for notification persistence adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewNotification, Notification, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by notification adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection => "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "notification repository query failed: {message}",
    }
}

/// Port for notification persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a notification row.
    async fn insert(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, NotificationRepositoryError>;

    /// List a user's notifications, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Count a user's unread notifications.
    async fn unread_count(&self, user_id: &UserId) -> Result<i64, NotificationRepositoryError>;

    /// Mark one notification read, scoped to its owner.
    ///
    /// Returns whether a row was updated.
    async fn mark_read(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<bool, NotificationRepositoryError>;

    /// Mark all of a user's notifications read, returning the updated count.
    async fn mark_all_read(&self, user_id: &UserId)
    -> Result<usize, NotificationRepositoryError>;
}
