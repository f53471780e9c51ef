//! Realtime notification bridge.
//!
//! Owns a per-user subscription to the notification insert feed. The handle
//! is acquired when a user signs in, swapped when the user changes, and
//! released deterministically on sign-out or shutdown — never left dangling.
//! Each insert invalidates the notification cache subtree and surfaces a
//! transient alert to whoever listens.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::QueryCache;
use crate::gateway::GatewayError;
use crate::key::QueryKey;

const ALERT_CAPACITY: usize = 16;

/// A notification insert delivered over the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    /// Row identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Category string.
    pub kind: String,
    /// Related booking, when applicable.
    #[serde(default)]
    pub related_booking_id: Option<String>,
}

/// Port for the per-user notification insert feed.
#[async_trait]
pub trait NotificationFeed: Send + Sync {
    /// Subscribe to inserts for one user. The subscription lives as long as
    /// the returned receiver.
    async fn subscribe(
        &self,
        user_id: &str,
    ) -> Result<mpsc::Receiver<NotificationEvent>, GatewayError>;
}

struct ActiveSubscription {
    user_id: String,
    task: JoinHandle<()>,
}

/// Bridges the notification feed into the query cache and an alert stream.
pub struct RealtimeBridge {
    feed: Arc<dyn NotificationFeed>,
    cache: QueryCache,
    alerts: broadcast::Sender<NotificationEvent>,
    active: Mutex<Option<ActiveSubscription>>,
}

impl RealtimeBridge {
    /// Create a bridge with no active subscription.
    #[must_use]
    pub fn new(feed: Arc<dyn NotificationFeed>, cache: QueryCache) -> Self {
        let (alerts, _rx) = broadcast::channel(ALERT_CAPACITY);
        Self {
            feed,
            cache,
            alerts,
            active: Mutex::new(None),
        }
    }

    /// Listen for transient alerts raised by incoming inserts.
    #[must_use]
    pub fn alerts(&self) -> broadcast::Receiver<NotificationEvent> {
        self.alerts.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ActiveSubscription>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self) {
        if let Some(subscription) = self.lock().take() {
            debug!(user_id = %subscription.user_id, "releasing notification subscription");
            subscription.task.abort();
        }
    }

    /// Point the bridge at a user, or at nobody.
    ///
    /// Re-pointing at the same user keeps the existing subscription; any
    /// other change releases the old one first.
    pub async fn set_user(&self, user_id: Option<&str>) -> Result<(), GatewayError> {
        {
            let active = self.lock();
            match (&*active, user_id) {
                (Some(subscription), Some(id)) if subscription.user_id == id => return Ok(()),
                (None, None) => return Ok(()),
                _ => {}
            }
        }
        self.release();

        let Some(user_id) = user_id else {
            return Ok(());
        };
        let mut events = self.feed.subscribe(user_id).await?;
        let cache = self.cache.clone();
        let alerts = self.alerts.clone();
        let owner = user_id.to_owned();
        let task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                // A fresh insert makes every cached notification view stale.
                cache.invalidate(&QueryKey::new(["notifications"]));
                let _ = alerts.send(event);
            }
            debug!(user_id = %owner, "notification feed ended");
        });
        *self.lock() = Some(ActiveSubscription {
            user_id: user_id.to_owned(),
            task,
        });
        Ok(())
    }

    /// Release any active subscription.
    pub fn shutdown(&self) {
        self.release();
    }
}

impl Drop for RealtimeBridge {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for subscription lifecycle and cache
    //! invalidation.
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    fn event(user_id: &str) -> NotificationEvent {
        NotificationEvent {
            id: "n-1".into(),
            user_id: user_id.into(),
            title: "Booking received".into(),
            message: "msg".into(),
            kind: "booking".into(),
            related_booking_id: None,
        }
    }

    /// Feed handing out channels the test can push into.
    #[derive(Default)]
    struct StubFeed {
        senders: Mutex<HashMap<String, mpsc::Sender<NotificationEvent>>>,
    }

    impl StubFeed {
        fn sender(&self, user_id: &str) -> mpsc::Sender<NotificationEvent> {
            self.senders
                .lock()
                .expect("lock")
                .get(user_id)
                .cloned()
                .expect("subscription exists")
        }

        fn is_subscribed(&self, user_id: &str) -> bool {
            self.senders
                .lock()
                .expect("lock")
                .get(user_id)
                .is_some_and(|sender| !sender.is_closed())
        }
    }

    #[async_trait]
    impl NotificationFeed for StubFeed {
        async fn subscribe(
            &self,
            user_id: &str,
        ) -> Result<mpsc::Receiver<NotificationEvent>, GatewayError> {
            let (tx, rx) = mpsc::channel(8);
            self.senders
                .lock()
                .expect("lock")
                .insert(user_id.to_owned(), tx);
            Ok(rx)
        }
    }

    #[tokio::test]
    async fn inserts_invalidate_the_notification_subtree_and_raise_alerts() {
        let feed = Arc::new(StubFeed::default());
        let cache = QueryCache::new();
        let list_key = QueryKey::new(["notifications", "list", "u-1"]);
        cache.put(&list_key, &vec!["old"]).expect("put");

        let bridge = RealtimeBridge::new(feed.clone(), cache.clone());
        let mut alerts = bridge.alerts();
        bridge.set_user(Some("u-1")).await.expect("subscribe");

        feed.sender("u-1").send(event("u-1")).await.expect("push event");
        let alert = tokio::time::timeout(Duration::from_secs(1), alerts.recv())
            .await
            .expect("alert in time")
            .expect("alert received");
        assert_eq!(alert.user_id, "u-1");

        // The cached list is now stale: a fetch must refetch.
        let refetched: Vec<String> = cache
            .fetch(&list_key, Duration::from_secs(60), || async {
                Ok(vec!["fresh".to_owned()])
            })
            .await
            .expect("fetch succeeds");
        assert_eq!(refetched, vec!["fresh".to_owned()]);
    }

    #[tokio::test]
    async fn changing_user_swaps_the_subscription() {
        let feed = Arc::new(StubFeed::default());
        let bridge = RealtimeBridge::new(feed.clone(), QueryCache::new());

        bridge.set_user(Some("u-1")).await.expect("subscribe u-1");
        assert!(feed.is_subscribed("u-1"));

        bridge.set_user(Some("u-2")).await.expect("subscribe u-2");
        tokio::task::yield_now().await;
        assert!(feed.is_subscribed("u-2"));
        assert!(!feed.is_subscribed("u-1"), "old channel released");
    }

    #[tokio::test]
    async fn same_user_keeps_the_existing_subscription() {
        let feed = Arc::new(StubFeed::default());
        let bridge = RealtimeBridge::new(feed.clone(), QueryCache::new());

        bridge.set_user(Some("u-1")).await.expect("subscribe");
        let first = feed.sender("u-1");
        bridge.set_user(Some("u-1")).await.expect("no-op");
        assert!(!first.is_closed(), "subscription untouched");
    }

    #[tokio::test]
    async fn signing_out_releases_the_subscription() {
        let feed = Arc::new(StubFeed::default());
        let bridge = RealtimeBridge::new(feed.clone(), QueryCache::new());

        bridge.set_user(Some("u-1")).await.expect("subscribe");
        bridge.set_user(None).await.expect("release");
        tokio::task::yield_now().await;
        assert!(!feed.is_subscribed("u-1"));
    }

    #[tokio::test]
    async fn dropping_the_bridge_releases_the_subscription() {
        let feed = Arc::new(StubFeed::default());
        let bridge = RealtimeBridge::new(feed.clone(), QueryCache::new());
        bridge.set_user(Some("u-1")).await.expect("subscribe");
        drop(bridge);
        tokio::task::yield_now().await;
        assert!(!feed.is_subscribed("u-1"));
    }
}
