//! Driving port for notification use-cases.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, NewNotification, Notification, UserId};

/// Domain use-case port for notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Persist a notification and push it to live subscribers.
    async fn notify(&self, notification: NewNotification) -> Result<Notification, Error>;

    /// List the user's notifications, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>, Error>;

    /// Count the user's unread notifications.
    async fn unread_count(&self, user_id: &UserId) -> Result<i64, Error>;

    /// Mark one notification read, scoped to its owner.
    async fn mark_read(&self, id: Uuid, user_id: &UserId) -> Result<(), Error>;

    /// Mark all of the user's notifications read.
    async fn mark_all_read(&self, user_id: &UserId) -> Result<(), Error>;
}
