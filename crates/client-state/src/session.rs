//! Client session store.
//!
//! An explicit state machine with three phases:
//!
//! ```text
//! Uninitialized -> Hydrating -> Ready
//! ```
//!
//! While `Hydrating`, consumers must treat identity as unknown rather than
//! "logged out" — rendering unauthenticated UI before persisted identity
//! loads is exactly the flash this store exists to prevent. Snapshots are
//! published over a watch channel so every consumer observes the same
//! transitions.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::gateway::{AuthGateway, GatewayError, Identity, IdentityStorage};

/// Lifecycle phase of the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// `hydrate` has not been called yet.
    Uninitialized,
    /// Persisted identity is loading; identity is unknown, not absent.
    Hydrating,
    /// Identity is resolved (present or definitively absent).
    Ready,
}

/// One published view of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Current phase.
    pub phase: SessionPhase,
    /// Resolved identity; meaningful only in `Ready`.
    pub identity: Option<Identity>,
}

impl SessionSnapshot {
    /// Whether a signed-in identity is definitively known.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Ready && self.identity.is_some()
    }

    /// Whether the store has finished resolving identity either way.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.phase == SessionPhase::Ready
    }
}

/// The client session store.
pub struct SessionStore {
    gateway: Arc<dyn AuthGateway>,
    storage: Arc<dyn IdentityStorage>,
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    /// Create a store in the `Uninitialized` phase.
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>, storage: Arc<dyn IdentityStorage>) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot {
            phase: SessionPhase::Uninitialized,
            identity: None,
        });
        Self {
            gateway,
            storage,
            tx,
        }
    }

    /// Subscribe to session snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    fn publish(&self, phase: SessionPhase, identity: Option<Identity>) {
        // send only fails with no receivers, which is fine: the next
        // subscriber still observes the latest value.
        let _ = self.tx.send(SessionSnapshot { phase, identity });
    }

    fn remember(&self, identity: &Identity) {
        self.storage.store(identity);
        self.storage.set_presence_marker(identity.id());
    }

    /// Resolve identity: load the persisted copy, then confirm against the
    /// server, which is authoritative.
    ///
    /// On transport failure the persisted identity is kept so an offline
    /// start still renders; the next successful check reconciles.
    pub async fn hydrate(&self) -> Result<(), GatewayError> {
        self.publish(SessionPhase::Hydrating, None);
        let persisted = self.storage.load();

        match self.gateway.current_user().await {
            Ok(Some(identity)) => {
                self.remember(&identity);
                self.publish(SessionPhase::Ready, Some(identity));
                Ok(())
            }
            Ok(None) => {
                // The server says no session; persisted identity is stale.
                self.storage.clear();
                self.publish(SessionPhase::Ready, None);
                Ok(())
            }
            Err(GatewayError::Transport { message }) => {
                debug!(message, "identity check unreachable; keeping persisted identity");
                self.publish(SessionPhase::Ready, persisted);
                Ok(())
            }
            Err(err) => {
                self.publish(SessionPhase::Ready, None);
                Err(err)
            }
        }
    }

    /// Sign in with a phone/code pair.
    pub async fn sign_in(&self, phone: &str, code: &str) -> Result<Identity, GatewayError> {
        let identity = self.gateway.client_login(phone, code).await?;
        self.remember(&identity);
        self.publish(SessionPhase::Ready, Some(identity.clone()));
        Ok(identity)
    }

    /// Sign up with a phone/name/code triple.
    pub async fn sign_up(
        &self,
        phone: &str,
        name: &str,
        code: &str,
    ) -> Result<Identity, GatewayError> {
        let identity = self.gateway.client_signup(phone, name, code).await?;
        self.remember(&identity);
        self.publish(SessionPhase::Ready, Some(identity.clone()));
        Ok(identity)
    }

    /// Sign out: clear server cookies best-effort, then scrub local state.
    ///
    /// A failed logout call never blocks the local sign-out; the cookie will
    /// die of natural expiry.
    pub async fn sign_out(&self) {
        if let Err(err) = self.gateway.logout().await {
            warn!(error = %err, "logout request failed; clearing local state anyway");
        }
        self.storage.clear();
        self.publish(SessionPhase::Ready, None);
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for the hydration barrier and the sign-in/out
    //! transitions.
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::gateway::{CodePurpose, MemoryStorage};

    fn identity(id: &str) -> Identity {
        Identity::Client {
            id: id.into(),
            phone: "01012345678".into(),
            name: "Jihye".into(),
        }
    }

    /// Gateway whose `current_user` waits until released, for observing the
    /// hydrating phase.
    struct GatedGateway {
        release: Notify,
        answer: Mutex<Result<Option<Identity>, GatewayError>>,
    }

    impl GatedGateway {
        fn new(answer: Result<Option<Identity>, GatewayError>) -> Arc<Self> {
            Arc::new(Self {
                release: Notify::new(),
                answer: Mutex::new(answer),
            })
        }
    }

    #[async_trait]
    impl AuthGateway for GatedGateway {
        async fn request_code(
            &self,
            _phone: &str,
            _purpose: CodePurpose,
        ) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn client_login(&self, _phone: &str, _code: &str) -> Result<Identity, GatewayError> {
            Err(GatewayError::rejected("unauthorized", "not in this test"))
        }

        async fn client_signup(
            &self,
            _phone: &str,
            _name: &str,
            _code: &str,
        ) -> Result<Identity, GatewayError> {
            Err(GatewayError::rejected("unauthorized", "not in this test"))
        }

        async fn current_user(&self) -> Result<Option<Identity>, GatewayError> {
            self.release.notified().await;
            self.answer.lock().expect("lock").clone()
        }

        async fn logout(&self) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    /// Gateway answering immediately with fixed responses.
    struct StubGateway {
        current: Result<Option<Identity>, GatewayError>,
        login: Result<Identity, GatewayError>,
    }

    #[async_trait]
    impl AuthGateway for StubGateway {
        async fn request_code(
            &self,
            _phone: &str,
            _purpose: CodePurpose,
        ) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn client_login(&self, _phone: &str, _code: &str) -> Result<Identity, GatewayError> {
            self.login.clone()
        }

        async fn client_signup(
            &self,
            _phone: &str,
            _name: &str,
            _code: &str,
        ) -> Result<Identity, GatewayError> {
            self.login.clone()
        }

        async fn current_user(&self) -> Result<Option<Identity>, GatewayError> {
            self.current.clone()
        }

        async fn logout(&self) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn hydration_holds_identity_unknown_until_resolution() {
        let gateway = GatedGateway::new(Ok(Some(identity("u-1"))));
        let storage = Arc::new(MemoryStorage::new());
        storage.store(&identity("u-1"));
        let store = Arc::new(SessionStore::new(gateway.clone(), storage));

        assert_eq!(store.snapshot().phase, SessionPhase::Uninitialized);

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.hydrate().await })
        };
        // Let hydrate publish its first transition.
        tokio::task::yield_now().await;
        let mid = store.snapshot();
        assert_eq!(mid.phase, SessionPhase::Hydrating);
        assert!(
            !mid.is_authenticated(),
            "identity unknown, not logged out, during hydration"
        );

        gateway.release.notify_one();
        task.await.expect("join").expect("hydrate succeeds");
        let done = store.snapshot();
        assert!(done.is_authenticated());
        assert_eq!(done.identity, Some(identity("u-1")));
    }

    #[tokio::test]
    async fn server_rejection_clears_stale_persisted_identity() {
        let storage = Arc::new(MemoryStorage::new());
        storage.store(&identity("u-1"));
        let store = SessionStore::new(
            Arc::new(StubGateway {
                current: Ok(None),
                login: Err(GatewayError::transport("unused")),
            }),
            storage.clone(),
        );

        store.hydrate().await.expect("hydrate succeeds");
        assert!(!store.snapshot().is_authenticated());
        assert!(storage.load().is_none(), "stale identity scrubbed");
    }

    #[tokio::test]
    async fn transport_failure_keeps_the_persisted_identity() {
        let storage = Arc::new(MemoryStorage::new());
        storage.store(&identity("u-1"));
        let store = SessionStore::new(
            Arc::new(StubGateway {
                current: Err(GatewayError::transport("offline")),
                login: Err(GatewayError::transport("unused")),
            }),
            storage,
        );

        store.hydrate().await.expect("hydrate tolerates offline");
        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated(), "offline start still renders");
    }

    #[tokio::test]
    async fn sign_in_persists_identity_and_presence_marker() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(
            Arc::new(StubGateway {
                current: Ok(None),
                login: Ok(identity("u-9")),
            }),
            storage.clone(),
        );

        let signed_in = store.sign_in("01012345678", "123456").await.expect("sign in");
        assert_eq!(signed_in.id(), "u-9");
        assert!(store.snapshot().is_authenticated());
        assert_eq!(storage.load(), Some(identity("u-9")));
        assert_eq!(storage.presence_marker().as_deref(), Some("u-9"));
    }

    #[tokio::test]
    async fn sign_out_scrubs_local_state() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(
            Arc::new(StubGateway {
                current: Ok(Some(identity("u-1"))),
                login: Ok(identity("u-1")),
            }),
            storage.clone(),
        );
        store.hydrate().await.expect("hydrate");
        assert!(store.snapshot().is_authenticated());

        store.sign_out().await;
        assert!(!store.snapshot().is_authenticated());
        assert!(store.snapshot().is_settled());
        assert!(storage.load().is_none());
        assert!(storage.presence_marker().is_none());
    }

    #[tokio::test]
    async fn subscribers_observe_transitions_in_order() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(
            Arc::new(StubGateway {
                current: Ok(Some(identity("u-1"))),
                login: Ok(identity("u-1")),
            }),
            storage,
        );
        let mut rx = store.subscribe();

        store.hydrate().await.expect("hydrate");
        // The watch channel coalesces intermediate values; the final state is
        // what matters to consumers.
        rx.changed().await.expect("change observed");
        assert!(rx.borrow().is_settled());
    }
}
