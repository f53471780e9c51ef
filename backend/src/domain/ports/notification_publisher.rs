//! Port for pushing freshly inserted notifications to live subscribers.
//!
//! Publishing is strictly best-effort fan-out to whoever is connected right
//! now; the persisted row remains the source of truth. The port is therefore
//! infallible and synchronous.

use crate::domain::Notification;

/// Port for realtime notification fan-out.
pub trait NotificationPublisher: Send + Sync {
    /// Push a freshly inserted notification to the owner's live feed.
    fn publish(&self, notification: &Notification);
}

/// Publisher that drops every event; used where no realtime feed is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotificationPublisher;

impl NotificationPublisher for NoOpNotificationPublisher {
    fn publish(&self, _notification: &Notification) {}
}
