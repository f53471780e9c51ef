//! Shared WebSocket adapter state: the per-user notification hub.
//!
//! The hub is the in-process realtime channel. The notification service
//! publishes every persisted insert; connected feed sessions subscribe by
//! user id. Senders are pruned lazily once their last subscriber is gone.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;

use crate::domain::ports::NotificationPublisher;
use crate::domain::{Notification, TokenCodec, UserId};

const CHANNEL_CAPACITY: usize = 32;

/// Fan-out hub keyed by user id.
#[derive(Default)]
pub struct NotificationHub {
    channels: Mutex<HashMap<UserId, broadcast::Sender<Notification>>>,
}

impl NotificationHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, broadcast::Sender<Notification>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to a user's notification inserts.
    pub fn subscribe(&self, user_id: &UserId) -> broadcast::Receiver<Notification> {
        let mut channels = self.lock();
        channels
            .entry(*user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Number of live subscribers for a user (test observability).
    #[must_use]
    pub fn subscriber_count(&self, user_id: &UserId) -> usize {
        self.lock()
            .get(user_id)
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

impl NotificationPublisher for NotificationHub {
    fn publish(&self, notification: &Notification) {
        let mut channels = self.lock();
        let Some(sender) = channels.get(&notification.user_id) else {
            return;
        };
        if sender.receiver_count() == 0 {
            channels.remove(&notification.user_id);
            return;
        }
        // Send only fails when every receiver is gone, which the prune above
        // already covers; drop the error either way.
        let _ = sender.send(notification.clone());
    }
}

/// Dependency bundle for the WebSocket feed endpoint.
#[derive(Clone)]
pub struct WsState {
    /// The in-process notification hub.
    pub hub: Arc<NotificationHub>,
    /// Codec for validating the upgrade request's session cookie.
    pub codec: Arc<TokenCodec>,
}

impl WsState {
    /// Construct state from explicit collaborators.
    #[must_use]
    pub fn new(hub: Arc<NotificationHub>, codec: Arc<TokenCodec>) -> Self {
        Self { hub, codec }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::NotificationKind;

    fn notification(user_id: UserId) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            title: "Booking received".into(),
            message: "msg".into(),
            kind: NotificationKind::Booking,
            related_booking_id: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn subscribers_receive_their_own_inserts() {
        let hub = NotificationHub::new();
        let user = UserId::random();
        let mut rx = hub.subscribe(&user);

        hub.publish(&notification(user));
        let received = rx.recv().await.expect("event delivered");
        assert_eq!(received.user_id, user);
    }

    #[tokio::test]
    async fn events_are_scoped_per_user() {
        let hub = NotificationHub::new();
        let alice = UserId::random();
        let bob = UserId::random();
        let mut alice_rx = hub.subscribe(&alice);

        hub.publish(&notification(bob));
        hub.publish(&notification(alice));
        let received = alice_rx.recv().await.expect("event delivered");
        assert_eq!(received.user_id, alice);
        assert!(alice_rx.try_recv().is_err(), "no cross-user delivery");
    }

    #[tokio::test]
    async fn dropped_subscribers_are_pruned_on_publish() {
        let hub = NotificationHub::new();
        let user = UserId::random();
        drop(hub.subscribe(&user));
        assert_eq!(hub.subscriber_count(&user), 0);

        // Publishing to a dead channel removes it.
        hub.publish(&notification(user));
        assert!(hub.lock().get(&user).is_none());
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let hub = NotificationHub::new();
        hub.publish(&notification(UserId::random()));
    }
}
